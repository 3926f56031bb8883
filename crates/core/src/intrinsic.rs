//! Intrinsic functions
//!
//! - Concat: joins the textual form of its evaluated parts
//! - GetProperty: reads a property from the holding element

use crate::element::ModelContext;
use crate::error::{Error, Result};
use crate::function::{Function, ModelValue};
use crate::value::Value;
use std::collections::HashMap;

/// `{"concat": [...]}`
#[derive(Debug, Clone)]
pub struct Concat {
    parts: Vec<ModelValue>,
}

impl Concat {
    /// Create a concatenation of `parts`
    pub fn new(parts: Vec<ModelValue>) -> Self {
        Self { parts }
    }
}

impl Function for Concat {
    fn raw_form(&self) -> Value {
        let parts = self.parts.iter().map(ModelValue::raw_form).collect();
        single_key("concat", Value::Array(parts))
    }

    fn evaluate(&self, ctx: &mut ModelContext, container: &Value) -> Result<Value> {
        let mut out = String::new();
        for part in &self.parts {
            out.push_str(&part.evaluate(ctx, container)?.to_string());
        }
        Ok(Value::String(out))
    }
}

/// `{"get_property": name}`
///
/// Looks under the container's `properties` mapping first, then at its top
/// level.
#[derive(Debug, Clone)]
pub struct GetProperty {
    name: String,
}

impl GetProperty {
    /// Create a lookup of property `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Function for GetProperty {
    fn raw_form(&self) -> Value {
        single_key("get_property", Value::String(self.name.clone()))
    }

    fn evaluate(&self, _ctx: &mut ModelContext, container: &Value) -> Result<Value> {
        let object = container.as_object().ok_or_else(|| Error::Evaluation {
            expression: self.raw_form().to_string(),
            cause: format!("container is {}, not an object", container.type_name()),
        })?;
        object
            .get("properties")
            .and_then(Value::as_object)
            .and_then(|props| props.get(&self.name))
            .or_else(|| object.get(&self.name))
            .cloned()
            .ok_or_else(|| Error::Evaluation {
                expression: self.raw_form().to_string(),
                cause: format!("property '{}' not found", self.name),
            })
    }
}

fn single_key(key: &str, value: Value) -> Value {
    let mut map = HashMap::with_capacity(1);
    map.insert(key.to_string(), value);
    Value::Object(map)
}
