//! Change-tracked containers
//!
//! A [`TrackedContainer`] wraps the mapping or sequence held by one record
//! field. Every mutating call:
//!
//! 1. asserts each new key/value/item against the container's kind
//! 2. applies the mutation only if every assertion passed
//! 3. notifies the owning record that the field changed
//!
//! Mutations below the top level go through [`NestedMut`] handles, which
//! notify the same owner, so editing `field["a"]["b"]` dirties the record
//! just like replacing `field["a"]`.
//!
//! The owner is held weakly: a container never keeps its record alive, and
//! a container whose record is gone mutates silently.
//!
//! # Concurrency
//!
//! Containers are not internally synchronized. Mutation takes `&mut self`;
//! sharing one container between threads needs the caller's own lock, the
//! same one that serializes the record's save cycle.

use crate::kind::StrictKind;
use crate::record::ChangeListener;
use modelstore_core::{Error, Result, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::trace;

struct Owner {
    listener: Weak<dyn ChangeListener>,
    field: String,
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Owner")
            .field("field", &self.field)
            .field("alive", &(self.listener.strong_count() > 0))
            .finish()
    }
}

fn signal(owner: Option<&Owner>, kind: &StrictKind) {
    trace!(
        target: "modelstore::tracked",
        kind = %kind.name(),
        field = owner.map(|o| o.field.as_str()).unwrap_or("<unbound>"),
        "Container changed"
    );
    if let Some(owner) = owner {
        if let Some(listener) = owner.listener.upgrade() {
            listener.changed(&owner.field);
        }
    }
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::storage(format!("index {} out of range for length {}", index, len))
}

fn not_a_mapping(what: &str) -> Error {
    Error::storage(format!("{} is not a mapping", what))
}

fn not_a_sequence(what: &str) -> Error {
    Error::storage(format!("{} is not a sequence", what))
}

/// A strict mapping or sequence bound to an owning record
#[derive(Debug)]
pub struct TrackedContainer {
    kind: Arc<StrictKind>,
    value: Value,
    owner: Option<Owner>,
}

impl TrackedContainer {
    // Callers must have checked `value` against `kind`
    pub(crate) fn new(kind: Arc<StrictKind>, value: Value) -> Self {
        Self {
            kind,
            value,
            owner: None,
        }
    }

    /// The kind this container enforces
    pub fn kind(&self) -> &Arc<StrictKind> {
        &self.kind
    }

    /// Attach the owner notified on every mutation
    pub fn bind(&mut self, listener: Weak<dyn ChangeListener>, field: impl Into<String>) {
        self.owner = Some(Owner {
            listener,
            field: field.into(),
        });
    }

    /// Detach from the owner
    pub fn unbind(&mut self) {
        self.owner = None;
    }

    /// Field name this container is bound under, if bound
    pub fn owner_field(&self) -> Option<&str> {
        self.owner.as_ref().map(|o| o.field.as_str())
    }

    /// Check whether an owner is attached
    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    /// Current value (always an `Object` or `Array`)
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    /// Copy of the current value
    pub fn to_value(&self) -> Value {
        self.value.clone()
    }

    /// Unwrap into the current value, dropping the owner
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Check if this container is a mapping
    pub fn is_dict(&self) -> bool {
        self.value.is_object()
    }

    /// Check if this container is a sequence
    pub fn is_list(&self) -> bool {
        self.value.is_array()
    }

    /// Number of entries or items
    pub fn len(&self) -> usize {
        match &self.value {
            Value::Object(map) => map.len(),
            Value::Array(items) => items.len(),
            _ => 0,
        }
    }

    /// Check if there are no entries or items
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Mapping view
    pub fn as_dict(&self) -> Option<&HashMap<String, Value>> {
        self.value.as_object()
    }

    /// Sequence view
    pub fn as_list(&self) -> Option<&[Value]> {
        self.value.as_array()
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict().and_then(|map| map.get(key))
    }

    /// Item at `index`
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|items| items.get(index))
    }

    fn changed(&self) {
        signal(self.owner.as_ref(), &self.kind);
    }

    fn dict_mut(&mut self) -> Result<&mut HashMap<String, Value>> {
        match &mut self.value {
            Value::Object(map) => Ok(map),
            _ => Err(not_a_mapping(self.kind.name())),
        }
    }

    fn list_mut(&mut self) -> Result<&mut Vec<Value>> {
        match &mut self.value {
            Value::Array(items) => Ok(items),
            _ => Err(not_a_sequence(self.kind.name())),
        }
    }

    // ------------------------------------------------------------------
    // Mapping mutation
    // ------------------------------------------------------------------

    /// Store `value` under `key`
    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let key = key.into();
        let value = value.into();
        self.kind.check_key(&key)?;
        self.kind.check_value(&key, &value)?;
        self.dict_mut()?.insert(key, value);
        self.changed();
        Ok(())
    }

    /// Return the value under `key`, inserting `default` first if absent
    ///
    /// `default` is checked even when the key exists. Only an insertion
    /// notifies the owner.
    pub fn set_default(&mut self, key: impl Into<String>, default: impl Into<Value>) -> Result<Value> {
        let key = key.into();
        let default = default.into();
        self.kind.check_key(&key)?;
        self.kind.check_value(&key, &default)?;
        let map = self.dict_mut()?;
        if let Some(existing) = map.get(&key) {
            return Ok(existing.clone());
        }
        map.insert(key, default.clone());
        self.changed();
        Ok(default)
    }

    /// Store every pair, or none if any pair violates the kind
    pub fn update<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.dict_mut()?;
        let pairs: Vec<(String, Value)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        for (key, value) in &pairs {
            self.kind.check_key(key)?;
            self.kind.check_value(key, value)?;
        }
        if pairs.is_empty() {
            return Ok(());
        }
        self.dict_mut()?.extend(pairs);
        self.changed();
        Ok(())
    }

    /// Delete `key`, returning its value if present
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        let removed = self.dict_mut()?.remove(key);
        if removed.is_some() {
            self.changed();
        }
        Ok(removed)
    }

    /// Remove every entry or item
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        match &mut self.value {
            Value::Object(map) => map.clear(),
            Value::Array(items) => items.clear(),
            _ => return,
        }
        self.changed();
    }

    // ------------------------------------------------------------------
    // Sequence mutation
    // ------------------------------------------------------------------

    /// Replace the item at `index`
    pub fn set_index(&mut self, index: usize, item: impl Into<Value>) -> Result<()> {
        let item = item.into();
        self.kind.check_item(index, &item)?;
        let items = self.list_mut()?;
        let len = items.len();
        let slot = items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
        *slot = item;
        self.changed();
        Ok(())
    }

    /// Add an item at the end
    pub fn append(&mut self, item: impl Into<Value>) -> Result<()> {
        let item = item.into();
        self.kind.check_item(self.len(), &item)?;
        self.list_mut()?.push(item);
        self.changed();
        Ok(())
    }

    /// Add every item at the end, or none if any item violates the kind
    pub fn extend<I, T>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.list_mut()?;
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        let base = self.len();
        for (offset, item) in items.iter().enumerate() {
            self.kind.check_item(base + offset, item)?;
        }
        if items.is_empty() {
            return Ok(());
        }
        self.list_mut()?.extend(items);
        self.changed();
        Ok(())
    }

    /// Insert an item before `index`; an index past the end appends
    pub fn insert(&mut self, index: usize, item: impl Into<Value>) -> Result<()> {
        let item = item.into();
        let index = index.min(self.len());
        self.kind.check_item(index, &item)?;
        self.list_mut()?.insert(index, item);
        self.changed();
        Ok(())
    }

    /// Delete the item at `index`
    pub fn remove_index(&mut self, index: usize) -> Result<Value> {
        let items = self.list_mut()?;
        if index >= items.len() {
            return Err(out_of_range(index, items.len()));
        }
        let removed = items.remove(index);
        self.changed();
        Ok(removed)
    }

    /// Remove and return the last item
    pub fn pop(&mut self) -> Result<Option<Value>> {
        let popped = self.list_mut()?.pop();
        if popped.is_some() {
            self.changed();
        }
        Ok(popped)
    }

    // ------------------------------------------------------------------
    // Nested access
    // ------------------------------------------------------------------

    /// Mutable handle to the container stored under `key`
    pub fn nested_mut(&mut self, key: &str) -> Result<NestedMut<'_>> {
        let map = match &mut self.value {
            Value::Object(map) => map,
            _ => return Err(not_a_mapping(self.kind.name())),
        };
        let slot = map
            .get_mut(key)
            .ok_or_else(|| Error::storage(format!("no value at key '{}'", key)))?;
        NestedMut::new(slot, self.owner.as_ref(), &self.kind, || format!("key '{}'", key))
    }

    /// Mutable handle to the container stored at `index`
    pub fn nested_index_mut(&mut self, index: usize) -> Result<NestedMut<'_>> {
        let items = match &mut self.value {
            Value::Array(items) => items,
            _ => return Err(not_a_sequence(self.kind.name())),
        };
        let len = items.len();
        let slot = items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
        NestedMut::new(slot, self.owner.as_ref(), &self.kind, || format!("index {}", index))
    }
}

impl PartialEq<Value> for TrackedContainer {
    fn eq(&self, other: &Value) -> bool {
        self.value == *other
    }
}

/// Mutable handle to a mapping or sequence nested inside a tracked container
///
/// Nested elements are not constrained by the kind; the kind governs the
/// top-level elements only, and a nested edit never changes a top-level
/// element's type.
pub struct NestedMut<'a> {
    value: &'a mut Value,
    owner: Option<&'a Owner>,
    kind: &'a StrictKind,
}

impl<'a> NestedMut<'a> {
    fn new(
        value: &'a mut Value,
        owner: Option<&'a Owner>,
        kind: &'a StrictKind,
        location: impl FnOnce() -> String,
    ) -> Result<Self> {
        if !(value.is_object() || value.is_array()) {
            return Err(Error::storage(format!(
                "value at {} is {}, not a container",
                location(),
                value.type_name()
            )));
        }
        Ok(Self { value, owner, kind })
    }

    fn changed(&self) {
        signal(self.owner, self.kind);
    }

    /// Current nested value
    pub fn as_value(&self) -> &Value {
        self.value
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.as_object().and_then(|map| map.get(key))
    }

    /// Item at `index`
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.value.as_array().and_then(|items| items.get(index))
    }

    /// Store `value` under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        match &mut *self.value {
            Value::Object(map) => map.insert(key.into(), value.into()),
            _ => return Err(not_a_mapping("nested value")),
        };
        self.changed();
        Ok(())
    }

    /// Delete `key`, returning its value if present
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>> {
        let removed = match &mut *self.value {
            Value::Object(map) => map.remove(key),
            _ => return Err(not_a_mapping("nested value")),
        };
        if removed.is_some() {
            self.changed();
        }
        Ok(removed)
    }

    /// Add an item at the end
    pub fn push(&mut self, item: impl Into<Value>) -> Result<()> {
        match &mut *self.value {
            Value::Array(items) => items.push(item.into()),
            _ => return Err(not_a_sequence("nested value")),
        }
        self.changed();
        Ok(())
    }

    /// Insert an item before `index`; an index past the end appends
    pub fn insert(&mut self, index: usize, item: impl Into<Value>) -> Result<()> {
        match &mut *self.value {
            Value::Array(items) => {
                let index = index.min(items.len());
                items.insert(index, item.into());
            }
            _ => return Err(not_a_sequence("nested value")),
        }
        self.changed();
        Ok(())
    }

    /// Replace the item at `index`
    pub fn set_index(&mut self, index: usize, item: impl Into<Value>) -> Result<()> {
        match &mut *self.value {
            Value::Array(items) => {
                let len = items.len();
                let slot = items.get_mut(index).ok_or_else(|| out_of_range(index, len))?;
                *slot = item.into();
            }
            _ => return Err(not_a_sequence("nested value")),
        }
        self.changed();
        Ok(())
    }

    /// Delete the item at `index`
    pub fn remove_index(&mut self, index: usize) -> Result<Value> {
        let removed = match &mut *self.value {
            Value::Array(items) if index < items.len() => items.remove(index),
            Value::Array(items) => return Err(out_of_range(index, items.len())),
            _ => return Err(not_a_sequence("nested value")),
        };
        self.changed();
        Ok(removed)
    }

    /// Handle to the container stored under `key`
    pub fn nested_mut(&mut self, key: &str) -> Result<NestedMut<'_>> {
        let slot = match &mut *self.value {
            Value::Object(map) => map
                .get_mut(key)
                .ok_or_else(|| Error::storage(format!("no value at key '{}'", key)))?,
            _ => return Err(not_a_mapping("nested value")),
        };
        NestedMut::new(slot, self.owner, self.kind, || format!("key '{}'", key))
    }

    /// Handle to the container stored at `index`
    pub fn nested_index_mut(&mut self, index: usize) -> Result<NestedMut<'_>> {
        let slot = match &mut *self.value {
            Value::Array(items) => {
                let len = items.len();
                items.get_mut(index).ok_or_else(|| out_of_range(index, len))?
            }
            _ => return Err(not_a_sequence("nested value")),
        };
        NestedMut::new(slot, self.owner, self.kind, || format!("index {}", index))
    }
}
