//! Text codec trait definitions.

use modelstore_core::{Result, Value};

/// Text codec trait.
///
/// Converts between in-memory values and the flat text stored in a single
/// field.
///
/// # Thread Safety
///
/// Codecs must be `Send + Sync`: kinds are shared process-wide and encode
/// from whichever thread saves a record.
pub trait TextCodec: Send + Sync {
    /// Encode a value for storage.
    ///
    /// `None` is the stored null and is returned unchanged.
    fn encode(&self, value: Option<&Value>) -> Result<Option<String>>;

    /// Decode stored text.
    ///
    /// Returns `Error::Codec` for malformed text; that signals corrupted
    /// data and is never replaced by a default.
    fn decode(&self, text: Option<&str>) -> Result<Option<Value>>;

    /// Unique codec identifier.
    fn codec_id(&self) -> &str;
}
