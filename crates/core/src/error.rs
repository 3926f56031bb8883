//! Error types for the model core
//!
//! Every failure raised by the strict containers, the codec, the deferred
//! value machinery and parameter coercion is a variant of [`Error`].
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use crate::types::{ElementType, Position};
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the model core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An element violated the declared key/value/item type of a strict container.
    ///
    /// Raised before the mutation is applied, so the container is unchanged.
    #[error("strict type violation at {position}: expected {expected}, but was {actual}")]
    StrictType {
        /// Declared element type
        expected: ElementType,
        /// Type tag of the offending element
        actual: ElementType,
        /// Where the offending element was introduced
        position: Position,
    },

    /// A lower-level container coercion failed
    #[error("storage error: {0}")]
    Storage(String),

    /// Persisted text is malformed, or a value cannot be encoded
    #[error("codec error: {0}")]
    Codec(String),

    /// A raw value cannot be coerced to the declared parameter type
    #[error("cannot coerce {value:?} to '{declared_type}': {reason}")]
    TypeCoercion {
        /// Declared type name as written
        declared_type: String,
        /// Rendering of the raw value
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// The declared parameter type is not one of the supported scalar types
    #[error("unsupported type '{declared_type}'")]
    UnsupportedType {
        /// Declared type name as written
        declared_type: String,
    },

    /// A deferred value failed to evaluate
    #[error("failed to evaluate {expression}: {cause}")]
    Evaluation {
        /// Raw form of the unevaluated expression
        expression: String,
        /// Failure cause
        cause: String,
    },

    /// The element does not support the requested projection
    #[error("{0} is not supported by this element")]
    NotSupported(&'static str),

    /// Process-wide settings were already fixed
    #[error("settings already initialized: {0}")]
    AlreadyInitialized(String),

    /// Settings could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build a strict type violation at `position`
    pub fn strict_type(expected: ElementType, actual: ElementType, position: Position) -> Self {
        Error::StrictType {
            expected,
            actual,
            position,
        }
    }

    /// Build a storage error carrying the message of a lower-level failure
    pub fn storage(message: impl Into<String>) -> Self {
        Error::Storage(message.into())
    }

    /// Build a codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Error::Codec(message.into())
    }

    /// Check whether this is a strict type violation
    pub fn is_strict_type(&self) -> bool {
        matches!(self, Error::StrictType { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Codec(e.to_string())
    }
}
