//! Strict kind registry
//!
//! Hands out exactly one [`StrictKind`] per type-parameter combination for
//! the lifetime of the process. Downstream code compares kinds by identity
//! (`Arc::ptr_eq`) to decide whether a field is already instrumented, so two
//! requests for the same parameters must never yield distinct kinds.
//!
//! ## Usage
//!
//! ```rust
//! use modelstore_core::ElementType;
//! use modelstore_storage::registry::{strict_dict, strict_list};
//! use std::sync::Arc;
//!
//! let a = strict_dict(ElementType::Str, ElementType::Int);
//! let b = strict_dict(ElementType::Str, ElementType::Int);
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! let items = strict_list(ElementType::Int);
//! assert!(items.is_list());
//! ```

use crate::kind::{KindKey, StrictKind};
use modelstore_core::ElementType;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

// The lock covers the whole check-then-insert sequence, so concurrent first
// uses of one key observe the same kind and no discarded kind escapes.
static STRICT_KINDS: Lazy<Mutex<HashMap<KindKey, Arc<StrictKind>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Get the kind for mappings with the given key and value types
pub fn strict_dict(key: ElementType, value: ElementType) -> Arc<StrictKind> {
    lookup(KindKey::Dict { key, value })
}

/// Get the kind for sequences with the given item type
pub fn strict_list(item: ElementType) -> Arc<StrictKind> {
    lookup(KindKey::List { item })
}

/// Unconstrained mapping kind
pub fn dict_kind() -> Arc<StrictKind> {
    strict_dict(ElementType::Any, ElementType::Any)
}

/// Unconstrained sequence kind
pub fn list_kind() -> Arc<StrictKind> {
    strict_list(ElementType::Any)
}

/// Get the kind registered for `key`, creating it on first use
pub fn lookup(key: KindKey) -> Arc<StrictKind> {
    let mut kinds = STRICT_KINDS.lock();
    let kind = kinds.entry(key).or_insert_with(|| {
        debug!(target: "modelstore::registry", kind = %key.kind_name(), "Registered strict kind");
        Arc::new(StrictKind::new(key))
    });
    Arc::clone(kind)
}

/// Get the kind for `key` only if it was already registered
pub fn get(key: KindKey) -> Option<Arc<StrictKind>> {
    STRICT_KINDS.lock().get(&key).cloned()
}

/// Number of kinds registered so far
pub fn registered_kinds() -> usize {
    STRICT_KINDS.lock().len()
}
