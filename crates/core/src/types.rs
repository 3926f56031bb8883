//! Element type tags for strict containers
//!
//! This module defines:
//! - ElementType: the declared type of a strict container's keys, values or items
//! - Position: where an element sits inside a container (used in errors)
//!
//! ## Null Policy
//!
//! `Null` is admitted only by [`ElementType::Any`] and [`ElementType::Null`].
//! A strict element declared as `Str` rejects null just like it rejects an
//! integer.
//!
//! ## Key Checks
//!
//! Mapping keys are text in the flat encoding, so a key type is checked
//! against the key's text: `Str` and `Any` accept every key, the scalar tags
//! accept keys whose text parses as that scalar, and `List`/`Dict` accept no key.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of an element held by a strict container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Wildcard: no constraint
    Any,
    /// Null only
    Null,
    /// Boolean
    Bool,
    /// 64-bit signed integer
    Int,
    /// 64-bit float
    Float,
    /// UTF-8 text
    Str,
    /// Sequence of values
    List,
    /// String-keyed mapping
    Dict,
}

impl ElementType {
    /// All element types, wildcard first
    pub const ALL: [ElementType; 8] = [
        ElementType::Any,
        ElementType::Null,
        ElementType::Bool,
        ElementType::Int,
        ElementType::Float,
        ElementType::Str,
        ElementType::List,
        ElementType::Dict,
    ];

    /// Get the canonical name of this type tag
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Any => "any",
            ElementType::Null => "null",
            ElementType::Bool => "bool",
            ElementType::Int => "int",
            ElementType::Float => "float",
            ElementType::Str => "str",
            ElementType::List => "list",
            ElementType::Dict => "dict",
        }
    }

    /// Parse a canonical type name (case-insensitive)
    pub fn from_name(name: &str) -> Option<ElementType> {
        let name = name.trim();
        ElementType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }

    /// Get the concrete type tag of a value
    ///
    /// Never returns `Any`.
    pub fn of(value: &Value) -> ElementType {
        match value {
            Value::Null => ElementType::Null,
            Value::Bool(_) => ElementType::Bool,
            Value::Int(_) => ElementType::Int,
            Value::Float(_) => ElementType::Float,
            Value::String(_) => ElementType::Str,
            Value::Array(_) => ElementType::List,
            Value::Object(_) => ElementType::Dict,
        }
    }

    /// Check if this is the wildcard
    pub fn is_any(self) -> bool {
        self == ElementType::Any
    }

    /// Check whether `value` satisfies this declared type
    ///
    /// No implicit coercions: `Int` does not admit floats or booleans.
    pub fn admits(self, value: &Value) -> bool {
        self.is_any() || ElementType::of(value) == self
    }

    /// Check whether a mapping key satisfies this declared key type
    pub fn admits_key(self, key: &str) -> bool {
        match self {
            ElementType::Any | ElementType::Str => true,
            ElementType::Null => key == "null",
            ElementType::Bool => key == "true" || key == "false",
            ElementType::Int => key.parse::<i64>().is_ok(),
            ElementType::Float => key.parse::<f64>().is_ok(),
            ElementType::List | ElementType::Dict => false,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of an element inside a container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// A mapping key
    Key(String),
    /// The value stored under a mapping key
    Value(String),
    /// A sequence index
    Index(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Key(key) => write!(f, "key '{}'", key),
            Position::Value(key) => write!(f, "value of key '{}'", key),
            Position::Index(index) => write!(f, "index {}", index),
        }
    }
}
