//! ModelStore - typed, change-tracked attribute model for persisted records
//!
//! Loosely structured record data (nested mappings and sequences) is stored
//! as one encoded text field, while in-memory code gets strictly typed,
//! mutation-aware access to it.
//!
//! # Quick Start
//!
//! ```
//! use modelstore::{strict_dict, ElementType, ModelSettings, RecordState, Value};
//!
//! let record = RecordState::with_settings(&ModelSettings::default());
//! let kind = strict_dict(ElementType::Str, ElementType::Int);
//!
//! let mut counts = record
//!     .load("counts", &kind, Some(r#"{"a":1}"#))?
//!     .expect("stored value is not null");
//! counts.set_item("b", 2)?;
//! assert!(counts.set_item("c", "three").is_err());
//!
//! assert_eq!(record.take_dirty(), vec!["counts".to_string()]);
//! assert_eq!(counts.get("b"), Some(&Value::Int(2)));
//! # Ok::<(), modelstore::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `modelstore-core`: values, element types, errors, the Element
//!   protocol, deferred values and parameter coercion
//! - `modelstore-storage`: the strict kind registry, tracked containers,
//!   owner notification, the text codec and settings

pub use modelstore_core::*;
pub use modelstore_storage::{
    codec, config, configure, dict_kind, disable_owner_tracking, get_codec, kind, list_kind,
    metadata, record, registry, settings, strict_dict, strict_list, tracked, ChangeListener,
    JsonTextCodec, KindKey, Metadata, ModelSettings, NestedMut, RecordState, StrictKind,
    TextCodec, TrackedContainer, CONFIG_FILE_NAME,
};
