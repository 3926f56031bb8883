//! Deferred values
//!
//! A [`Deferred`] is a placeholder for a value that should eventually be
//! derived by evaluating a [`Function`]. Its identity is its state: copying a
//! document that holds one must alias it, never clone it. [`DeepCopy`] makes
//! that explicit; every container impl copies recursively and stops at
//! deferred leaves.

use crate::element::ModelContext;
use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An intrinsic function whose result is computed on demand
///
/// Evaluation may run more than once and must return equivalent results
/// each time.
pub trait Function: fmt::Debug + Send + Sync {
    /// Describe the unevaluated expression (not its result)
    fn raw_form(&self) -> Value;

    /// Compute the value, given the raw form of the holding element
    fn evaluate(&self, ctx: &mut ModelContext, container: &Value) -> Result<Value>;
}

/// Shared handle to an unevaluated function
#[derive(Clone)]
pub struct Deferred(Arc<dyn Function>);

impl Deferred {
    /// Wrap a function
    pub fn new<F: Function + 'static>(function: F) -> Self {
        Self(Arc::new(function))
    }

    /// Raw form of the unevaluated expression
    pub fn raw_form(&self) -> Value {
        self.0.raw_form()
    }

    /// Evaluate the function
    ///
    /// # Errors
    ///
    /// Any failure is reported as `Error::Evaluation` carrying the raw form
    /// of the expression.
    pub fn evaluate(&self, ctx: &mut ModelContext, container: &Value) -> Result<Value> {
        self.0
            .evaluate(ctx, container)
            .map_err(|err| match err {
                Error::Evaluation { .. } => err,
                other => Error::Evaluation {
                    expression: self.raw_form().to_string(),
                    cause: other.to_string(),
                },
            })
    }

    /// Check whether both handles refer to the same function instance
    pub fn same_instance(&self, other: &Deferred) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.0) as *const (),
            Arc::as_ptr(&other.0) as *const (),
        )
    }
}

impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Deferred").field(&self.0).finish()
    }
}

/// Recursive copy that aliases deferred values
pub trait DeepCopy {
    /// Copy `self`, recursing into containers
    fn deep_copy(&self) -> Self;
}

impl DeepCopy for Deferred {
    fn deep_copy(&self) -> Self {
        // Aliasing keeps the evaluation state shared
        Deferred(Arc::clone(&self.0))
    }
}

impl DeepCopy for Value {
    fn deep_copy(&self) -> Self {
        self.clone()
    }
}

impl<T: DeepCopy> DeepCopy for Vec<T> {
    fn deep_copy(&self) -> Self {
        self.iter().map(DeepCopy::deep_copy).collect()
    }
}

impl<T: DeepCopy> DeepCopy for Option<T> {
    fn deep_copy(&self) -> Self {
        self.as_ref().map(DeepCopy::deep_copy)
    }
}

impl<T: DeepCopy> DeepCopy for HashMap<String, T> {
    fn deep_copy(&self) -> Self {
        self.iter().map(|(k, v)| (k.clone(), v.deep_copy())).collect()
    }
}

/// A document whose leaves may be deferred
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue {
    /// Plain value
    Value(Value),
    /// Not yet evaluated
    Deferred(Deferred),
    /// Sequence that may contain deferred leaves
    List(Vec<ModelValue>),
    /// Mapping that may contain deferred leaves
    Map(HashMap<String, ModelValue>),
}

impl ModelValue {
    /// Project to raw data; deferred leaves become their expression
    pub fn raw_form(&self) -> Value {
        match self {
            ModelValue::Value(v) => v.clone(),
            ModelValue::Deferred(d) => d.raw_form(),
            ModelValue::List(items) => Value::Array(items.iter().map(Self::raw_form).collect()),
            ModelValue::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.raw_form()))
                    .collect(),
            ),
        }
    }

    /// Evaluate every deferred leaf, producing a plain value
    pub fn evaluate(&self, ctx: &mut ModelContext, container: &Value) -> Result<Value> {
        match self {
            ModelValue::Value(v) => Ok(v.clone()),
            ModelValue::Deferred(d) => d.evaluate(ctx, container),
            ModelValue::List(items) => items
                .iter()
                .map(|item| item.evaluate(ctx, container))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            ModelValue::Map(map) => map
                .iter()
                .map(|(k, v)| Ok((k.clone(), v.evaluate(ctx, container)?)))
                .collect::<Result<HashMap<_, _>>>()
                .map(Value::Object),
        }
    }

    /// Check whether any leaf is deferred
    pub fn contains_deferred(&self) -> bool {
        match self {
            ModelValue::Value(_) => false,
            ModelValue::Deferred(_) => true,
            ModelValue::List(items) => items.iter().any(Self::contains_deferred),
            ModelValue::Map(map) => map.values().any(Self::contains_deferred),
        }
    }
}

impl DeepCopy for ModelValue {
    fn deep_copy(&self) -> Self {
        match self {
            ModelValue::Value(v) => ModelValue::Value(v.deep_copy()),
            ModelValue::Deferred(d) => ModelValue::Deferred(d.deep_copy()),
            ModelValue::List(items) => ModelValue::List(items.deep_copy()),
            ModelValue::Map(map) => ModelValue::Map(map.deep_copy()),
        }
    }
}

impl From<Value> for ModelValue {
    fn from(v: Value) -> Self {
        ModelValue::Value(v)
    }
}

impl From<Deferred> for ModelValue {
    fn from(d: Deferred) -> Self {
        ModelValue::Deferred(d)
    }
}
