//! Strict container kinds
//!
//! A [`StrictKind`] describes one strict container type: the shape (mapping
//! or sequence) and the declared element types. Kinds are created only by
//! the registry (see [`crate::registry`]) so that each type-parameter
//! combination has exactly one kind per process; equality between kinds is
//! identity.
//!
//! A kind knows how to:
//! - check keys, values and items against its element types
//! - coerce a plain value into a [`TrackedContainer`]
//! - encode a container to text and decode text back through its codec

use crate::codec::{JsonTextCodec, TextCodec};
use crate::tracked::TrackedContainer;
use modelstore_core::{ElementType, Error, Position, Result, Value};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Registry key: the type parameters of a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindKey {
    /// Mapping with declared key and value types
    Dict {
        /// Declared key type
        key: ElementType,
        /// Declared value type
        value: ElementType,
    },
    /// Sequence with a declared item type
    List {
        /// Declared item type
        item: ElementType,
    },
}

impl KindKey {
    /// Generated kind name, e.g. `StrictDict_str_int`
    pub fn kind_name(&self) -> String {
        match self {
            KindKey::Dict { key, value } => format!("StrictDict_{}_{}", key, value),
            KindKey::List { item } => format!("StrictList_{}", item),
        }
    }
}

/// Identity-stable descriptor of a strict container type
pub struct StrictKind {
    key: KindKey,
    name: String,
    codec: Box<dyn TextCodec>,
}

impl StrictKind {
    pub(crate) fn new(key: KindKey) -> Self {
        Self {
            key,
            name: key.kind_name(),
            codec: Box::new(JsonTextCodec),
        }
    }

    /// Type parameters of this kind
    pub fn key(&self) -> KindKey {
        self.key
    }

    /// Generated kind name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if this kind is a mapping
    pub fn is_dict(&self) -> bool {
        matches!(self.key, KindKey::Dict { .. })
    }

    /// Check if this kind is a sequence
    pub fn is_list(&self) -> bool {
        matches!(self.key, KindKey::List { .. })
    }

    /// Codec used by [`encode`](Self::encode) and [`decode`](Self::decode)
    pub fn codec(&self) -> &dyn TextCodec {
        self.codec.as_ref()
    }

    /// Assert a mapping key against the declared key type
    pub fn check_key(&self, key: &str) -> Result<()> {
        match self.key {
            KindKey::Dict { key: expected, .. } if !expected.admits_key(key) => Err(
                Error::strict_type(expected, ElementType::Str, Position::Key(key.to_string())),
            ),
            KindKey::Dict { .. } => Ok(()),
            KindKey::List { .. } => Err(self.wrong_shape("keyed access")),
        }
    }

    /// Assert the value stored under `key` against the declared value type
    pub fn check_value(&self, key: &str, value: &Value) -> Result<()> {
        match self.key {
            KindKey::Dict { value: expected, .. } if !expected.admits(value) => {
                Err(Error::strict_type(
                    expected,
                    ElementType::of(value),
                    Position::Value(key.to_string()),
                ))
            }
            KindKey::Dict { .. } => Ok(()),
            KindKey::List { .. } => Err(self.wrong_shape("keyed access")),
        }
    }

    /// Assert an item placed at `index` against the declared item type
    pub fn check_item(&self, index: usize, item: &Value) -> Result<()> {
        match self.key {
            KindKey::List { item: expected } if !expected.admits(item) => Err(
                Error::strict_type(expected, ElementType::of(item), Position::Index(index)),
            ),
            KindKey::List { .. } => Ok(()),
            KindKey::Dict { .. } => Err(self.wrong_shape("indexed access")),
        }
    }

    /// Assert every element of a plain container, failing on the first violation
    pub fn check_all(&self, value: &Value) -> Result<()> {
        match (self.key, value) {
            (KindKey::Dict { .. }, Value::Object(map)) => map.iter().try_for_each(|(k, v)| {
                self.check_key(k)?;
                self.check_value(k, v)
            }),
            (KindKey::List { .. }, Value::Array(items)) => items
                .iter()
                .enumerate()
                .try_for_each(|(i, item)| self.check_item(i, item)),
            (_, other) => Err(Error::storage(format!(
                "{} does not accept objects of type {}",
                self.name,
                other.type_name()
            ))),
        }
    }

    /// Convert a plain value into a tracked container of this kind
    ///
    /// `Null` is the null field and yields `None`. A mapping (for dict kinds)
    /// or sequence (for list kinds) is checked element by element and
    /// wrapped. Anything else is rejected with `Error::Storage`.
    pub fn coerce(self: &Arc<Self>, field: &str, value: Value) -> Result<Option<TrackedContainer>> {
        if value.is_null() {
            return Ok(None);
        }
        self.wrap(field, value).map(Some)
    }

    /// Accept an existing tracked container for this kind
    ///
    /// A container of this kind is returned unchanged, owner included. A
    /// container of another kind is re-checked against this kind and
    /// returned detached from its previous owner.
    pub fn adopt(self: &Arc<Self>, field: &str, container: TrackedContainer) -> Result<TrackedContainer> {
        if Arc::ptr_eq(container.kind(), self) {
            return Ok(container);
        }
        self.wrap(field, container.into_value())
    }

    fn wrap(self: &Arc<Self>, field: &str, value: Value) -> Result<TrackedContainer> {
        let shape_ok = match self.key {
            KindKey::Dict { .. } => value.is_object(),
            KindKey::List { .. } => value.is_array(),
        };
        if !shape_ok {
            return Err(Error::storage(format!(
                "attribute '{}' does not accept objects of type {}",
                field,
                value.type_name()
            )));
        }
        self.check_all(&value)?;
        trace!(target: "modelstore::kind", kind = %self.name, field, "Coerced plain value");
        Ok(TrackedContainer::new(Arc::clone(self), value))
    }

    /// Encode a field value to stored text
    pub fn encode(&self, container: Option<&TrackedContainer>) -> Result<Option<String>> {
        self.codec.encode(container.map(TrackedContainer::as_value))
    }

    /// Decode stored text into a tracked container of this kind
    ///
    /// Stored null and JSON `null` both yield `None`.
    pub fn decode(self: &Arc<Self>, field: &str, text: Option<&str>) -> Result<Option<TrackedContainer>> {
        match self.codec.decode(text)? {
            Some(value) => self.coerce(field, value),
            None => Ok(None),
        }
    }

    fn wrong_shape(&self, operation: &str) -> Error {
        Error::storage(format!("{} does not support {}", self.name, operation))
    }
}

impl PartialEq for StrictKind {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for StrictKind {}

impl fmt::Debug for StrictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrictKind")
            .field("name", &self.name)
            .field("codec", &self.codec.codec_id())
            .finish()
    }
}

impl fmt::Display for StrictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
