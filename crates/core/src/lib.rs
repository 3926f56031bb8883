//! Core types and traits for the model store
//!
//! This crate defines the foundational types used throughout the system:
//! - Value: Unified value enum for every record field element
//! - ElementType: Declared element types for strict containers
//! - Error: Error type hierarchy
//! - Element: Protocol shared by model elements (raw form, validate, coerce, dump)
//! - Deferred / Function: Placeholders for values computed on demand
//! - DeepCopy: Recursive copy that aliases deferred values
//! - Parameter: Typed parameters with scalar coercion

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod element;
pub mod error;
pub mod function;
pub mod intrinsic;
pub mod parameter;
pub mod types;
pub mod value;

pub use element::{Element, Instantiable, Issue, IssueLevel, ModelContext};
pub use error::{Error, Result};
pub use function::{DeepCopy, Deferred, Function, ModelValue};
pub use intrinsic::{Concat, GetProperty};
pub use parameter::{coerce, Parameter, ParameterValue, ScalarType};
pub use types::{ElementType, Position};
pub use value::Value;
