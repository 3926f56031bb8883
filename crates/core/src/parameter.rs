//! Typed parameters
//!
//! A [`Parameter`] stores its value as raw text together with a declared type
//! name. [`coerce`] turns the raw value into a native scalar; unknown type
//! names fail with `Error::UnsupportedType` instead of passing the raw value
//! through.
//!
//! | declared type | result |
//! |---------------|--------|
//! | `str`         | textual form of the raw value |
//! | `int`         | parsed integer, or `TypeCoercion` |
//! | `bool`        | truthiness of the raw value |
//! | `float`       | parsed float, or `TypeCoercion` |
//! | unset         | `Null`, no coercion attempted |
//! | anything else | `UnsupportedType` |

use crate::element::{Element, Instantiable, IssueLevel, ModelContext};
use crate::error::{Error, Result};
use crate::function::{DeepCopy, Deferred};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Scalar types a parameter may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Text
    Str,
    /// 64-bit signed integer
    Int,
    /// Boolean (truthiness)
    Bool,
    /// 64-bit float
    Float,
}

impl ScalarType {
    /// Parse a declared type name, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedType` for any other name.
    pub fn parse(declared_type: &str) -> Result<ScalarType> {
        match declared_type.trim().to_ascii_lowercase().as_str() {
            "str" => Ok(ScalarType::Str),
            "int" => Ok(ScalarType::Int),
            "bool" => Ok(ScalarType::Bool),
            "float" => Ok(ScalarType::Float),
            _ => Err(Error::UnsupportedType {
                declared_type: declared_type.to_string(),
            }),
        }
    }

    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarType::Str => "str",
            ScalarType::Int => "int",
            ScalarType::Bool => "bool",
            ScalarType::Float => "float",
        }
    }

    /// Convert `raw` to this type
    pub fn coerce(self, declared_type: &str, raw: &Value) -> Result<Value> {
        let fail = |reason: &str| Error::TypeCoercion {
            declared_type: declared_type.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        };

        match self {
            ScalarType::Str => Ok(Value::String(raw.to_string())),
            ScalarType::Bool => Ok(Value::Bool(raw.is_truthy())),
            ScalarType::Int => match raw {
                Value::Int(i) => Ok(Value::Int(*i)),
                Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
                Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                    Ok(Value::Int(*f as i64))
                }
                Value::Float(_) => Err(fail("float is not integral")),
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|e| fail(&e.to_string())),
                other => Err(fail(&format!("{} is not a scalar", other.type_name()))),
            },
            ScalarType::Float => match raw {
                Value::Float(f) => Ok(Value::Float(*f)),
                Value::Int(i) => Ok(Value::Float(*i as f64)),
                Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|e| fail(&e.to_string())),
                other => Err(fail(&format!("{} is not a scalar", other.type_name()))),
            },
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coerce a raw value according to a declared type name
///
/// A null raw value stays null for every supported type.
pub fn coerce(declared_type: Option<&str>, raw: &Value) -> Result<Value> {
    let Some(declared_type) = declared_type else {
        return Ok(Value::Null);
    };
    let scalar = ScalarType::parse(declared_type)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    scalar.coerce(declared_type, raw)
}

/// Stored state of a parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    /// Raw text as persisted
    Raw(Option<String>),
    /// Result of evaluating a deferred value
    Evaluated(Value),
    /// Not yet evaluated
    Deferred(Deferred),
}

impl DeepCopy for ParameterValue {
    fn deep_copy(&self) -> Self {
        match self {
            ParameterValue::Raw(raw) => ParameterValue::Raw(raw.clone()),
            ParameterValue::Evaluated(v) => ParameterValue::Evaluated(v.deep_copy()),
            ParameterValue::Deferred(d) => ParameterValue::Deferred(d.deep_copy()),
        }
    }
}

/// A named, typed value
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Declared type name (case-insensitive)
    pub type_name: Option<String>,
    /// Stored value
    pub value: ParameterValue,
    /// Free-form description
    pub description: Option<String>,
}

impl Parameter {
    /// Create a parameter from its raw specification
    pub fn new(name: impl Into<String>, type_name: Option<&str>, raw: Option<&str>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(str::to_string),
            value: ParameterValue::Raw(raw.map(str::to_string)),
            description: None,
        }
    }

    /// Create a parameter whose value is computed later
    pub fn deferred(name: impl Into<String>, type_name: Option<&str>, value: Deferred) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.map(str::to_string),
            value: ParameterValue::Deferred(value),
            description: None,
        }
    }

    /// Attach a description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check whether the value still awaits evaluation
    pub fn is_deferred(&self) -> bool {
        matches!(self.value, ParameterValue::Deferred(_))
    }

    /// The typed value
    ///
    /// # Errors
    ///
    /// Coercion failures, or `Error::Evaluation` if the value is still
    /// deferred.
    pub fn value(&self) -> Result<Value> {
        let declared = self.type_name.as_deref();
        match &self.value {
            ParameterValue::Raw(None) => coerce(declared, &Value::Null),
            ParameterValue::Raw(Some(text)) => coerce(declared, &Value::String(text.clone())),
            ParameterValue::Evaluated(v) => coerce(declared, v),
            ParameterValue::Deferred(d) => Err(Error::Evaluation {
                expression: d.raw_form().to_string(),
                cause: "value has not been evaluated".to_string(),
            }),
        }
    }
}

impl Element for Parameter {
    fn raw_form(&self) -> Result<Value> {
        let value = match &self.value {
            ParameterValue::Deferred(d) => d.raw_form(),
            _ => self.value()?,
        };
        let mut map = HashMap::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert("type_name".to_string(), Value::from(self.type_name.clone()));
        map.insert("value".to_string(), value);
        map.insert("description".to_string(), Value::from(self.description.clone()));
        Ok(Value::Object(map))
    }

    fn validate(&self, ctx: &mut ModelContext) {
        if self.is_deferred() {
            return;
        }
        if let Err(err) = self.value() {
            ctx.report(
                IssueLevel::Error,
                format!("parameter '{}': {}", self.name, err),
            );
        }
    }

    fn coerce_values(
        &mut self,
        ctx: &mut ModelContext,
        container: &Value,
        report_issues: bool,
    ) -> Result<()> {
        let ParameterValue::Deferred(deferred) = &self.value else {
            return Ok(());
        };
        let outcome = deferred
            .evaluate(ctx, container)
            .and_then(|v| coerce(self.type_name.as_deref(), &v).map(|_| v));
        match outcome {
            Ok(v) => {
                trace!(
                    target: "modelstore::parameter",
                    parameter = %self.name,
                    value = %v,
                    "Evaluated deferred parameter"
                );
                self.value = ParameterValue::Evaluated(v);
                Ok(())
            }
            Err(err) if report_issues => {
                ctx.report(
                    IssueLevel::Error,
                    format!("parameter '{}': {}", self.name, err),
                );
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn dump(&self, ctx: &mut ModelContext) {
        let rendered = match &self.value {
            ParameterValue::Deferred(d) => d.raw_form().to_string(),
            _ => match self.value() {
                Ok(v) => v.to_string(),
                Err(err) => format!("<{}>", err),
            },
        };
        ctx.write_line(format!("{}: {}", self.name, rendered));
        ctx.indented(|ctx| {
            if let Some(type_name) = &self.type_name {
                ctx.write_line(format!("Type: {}", type_name));
            }
            if let Some(description) = &self.description {
                ctx.write_line(format!("Description: {}", description));
            }
        });
    }
}

impl Instantiable for Parameter {
    type Instance = Parameter;

    fn instantiate(&self, _ctx: &mut ModelContext, _container: &Value) -> Result<Parameter> {
        Ok(Parameter {
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            value: self.value.deep_copy(),
            description: self.description.clone(),
        })
    }
}
