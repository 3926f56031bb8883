//! Metadata record
//!
//! A named bag of loosely structured values persisted as one encoded text
//! field. It is the smallest complete record built on this crate: a
//! [`RecordState`] owner, one strict `str -> any` mapping field wired to
//! it, and a save path that re-encodes the field only when it changed.

use crate::kind::StrictKind;
use crate::record::RecordState;
use crate::registry::strict_dict;
use crate::tracked::TrackedContainer;
use modelstore_core::{Element, ElementType, Error, IssueLevel, ModelContext, Result, Value};
use std::collections::HashMap;
use std::sync::Arc;

const VALUES_FIELD: &str = "values";

fn values_kind() -> Arc<StrictKind> {
    strict_dict(ElementType::Str, ElementType::Any)
}

/// Named metadata record
#[derive(Debug)]
pub struct Metadata {
    state: Arc<RecordState>,
    name: String,
    values: TrackedContainer,
}

impl Metadata {
    /// Create an unsaved record with no values
    ///
    /// A new record starts dirty so that the first save writes it.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Self::create(RecordState::new(), name.into())
    }

    /// Create an unsaved record owned by an explicit record state
    pub fn with_state(state: Arc<RecordState>, name: impl Into<String>) -> Result<Self> {
        Self::create(state, name.into())
    }

    fn create(state: Arc<RecordState>, name: String) -> Result<Self> {
        let values = state
            .assign(VALUES_FIELD, &values_kind(), Value::Object(HashMap::new()))?
            .ok_or_else(|| Error::storage("metadata values cannot be null"))?;
        Ok(Self { state, name, values })
    }

    /// Rebuild a record from its stored text; stored null is an empty mapping
    pub fn load(name: impl Into<String>, text: Option<&str>) -> Result<Self> {
        Self::load_with_state(RecordState::new(), name, text)
    }

    /// Rebuild a record from its stored text under an explicit record state
    pub fn load_with_state(
        state: Arc<RecordState>,
        name: impl Into<String>,
        text: Option<&str>,
    ) -> Result<Self> {
        let kind = values_kind();
        let values = match state.load(VALUES_FIELD, &kind, text)? {
            Some(values) => values,
            None => state
                .bind(VALUES_FIELD, &kind, Value::Object(HashMap::new()))?
                .ok_or_else(|| Error::storage("metadata values cannot be null"))?,
        };
        Ok(Self {
            state,
            name: name.into(),
            values,
        })
    }

    /// Record name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning record state
    pub fn state(&self) -> &Arc<RecordState> {
        &self.state
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Store `value` under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        self.values.set_item(key, value)
    }

    /// The tracked values field
    pub fn values(&self) -> &TrackedContainer {
        &self.values
    }

    /// The tracked values field, for in-place edits
    pub fn values_mut(&mut self) -> &mut TrackedContainer {
        &mut self.values
    }

    /// Encoded values if the record changed since the last save
    ///
    /// Returns `None` when there is nothing to write. The record is clean
    /// afterwards either way.
    pub fn save(&self) -> Result<Option<String>> {
        if !self.state.is_dirty() {
            return Ok(None);
        }
        let text = values_kind().encode(Some(&self.values))?;
        self.state.take_dirty();
        Ok(text)
    }
}

impl Element for Metadata {
    fn raw_form(&self) -> Result<Value> {
        let mut map = HashMap::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert(VALUES_FIELD.to_string(), self.values.to_value());
        Ok(Value::Object(map))
    }

    fn validate(&self, ctx: &mut ModelContext) {
        if self.name.is_empty() {
            ctx.report(IssueLevel::Warning, "metadata has an empty name");
        }
    }

    fn dump(&self, ctx: &mut ModelContext) {
        ctx.write_line(format!("{}:", self.name));
        let mut entries: Vec<_> = self
            .values
            .as_dict()
            .map(|map| map.iter().collect())
            .unwrap_or_default();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        ctx.indented(|ctx| {
            for (key, value) in entries {
                ctx.write_line(format!("{}: {}", key, value));
            }
        });
    }
}
