//! Text codec for strict container fields.
//!
//! A strict container is persisted in a single text field. Every value
//! written to or read from that field goes through a [`TextCodec`]:
//!
//! - `None` (the stored null) maps to `None` in both directions
//! - any other value is serialized to flat text, and parsed back on read
//!
//! Encoding order follows the iteration order of the source mapping; no key
//! ordering is imposed.
//!
//! # Usage
//!
//! ```ignore
//! use modelstore_storage::codec::{TextCodec, JsonTextCodec};
//!
//! let codec = JsonTextCodec;
//! let text = codec.encode(Some(&value))?;
//! let back = codec.decode(text.as_deref())?;
//! ```

mod json;
mod traits;

pub use json::JsonTextCodec;
pub use traits::TextCodec;

use modelstore_core::{Error, Result};

/// Get a codec by its identifier.
///
/// # Known Codecs
///
/// - `"json"`: JSON text (the default)
pub fn get_codec(codec_id: &str) -> Result<Box<dyn TextCodec>> {
    match codec_id {
        "json" => Ok(Box::new(JsonTextCodec)),
        _ => Err(Error::codec(format!("unknown codec: {}", codec_id))),
    }
}
