//! JSON text codec.

use super::traits::TextCodec;
use modelstore_core::{Error, Result, Value};

/// JSON text codec - the default.
///
/// # Example
///
/// ```
/// use modelstore_core::Value;
/// use modelstore_storage::codec::{JsonTextCodec, TextCodec};
///
/// let codec = JsonTextCodec;
/// let value = Value::Array(vec![Value::Int(1), Value::from("a")]);
///
/// let text = codec.encode(Some(&value)).unwrap();
/// assert_eq!(text.as_deref(), Some("[1,\"a\"]"));
///
/// let decoded = codec.decode(text.as_deref()).unwrap();
/// assert_eq!(decoded, Some(value));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTextCodec;

impl TextCodec for JsonTextCodec {
    fn encode(&self, value: Option<&Value>) -> Result<Option<String>> {
        let Some(value) = value else {
            return Ok(None);
        };
        let json = value.to_json()?;
        Ok(Some(serde_json::to_string(&json)?))
    }

    fn decode(&self, text: Option<&str>) -> Result<Option<Value>> {
        let Some(text) = text else {
            return Ok(None);
        };
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| Error::codec(format!("malformed stored text: {}", e)))?;
        Ok(Some(Value::from(json)))
    }

    fn codec_id(&self) -> &str {
        "json"
    }
}
