//! Request body and query-string decoding.
//!
//! Turns raw request input into the keyed [`Value::Map`] the validator
//! expects. Form fields that appear more than once become a sequence of
//! strings; everything else keeps the shape of the source document.

mod error;
mod format;
mod form;
mod json;
mod yaml;

pub use error::IngestError;
pub use format::BodyFormat;

use fieldguard_core::Value;

/// Decode a request body according to its `Content-Type` header.
///
/// Media-type parameters such as `charset` are ignored. A body that is
/// empty or only whitespace decodes to an empty map.
pub fn decode_body(content_type: &str, body: &[u8]) -> Result<Value, IngestError> {
    let format = BodyFormat::from_content_type(content_type)?;
    decode_as(format, body)
}

/// Decode a body whose format is already known.
pub fn decode_as(format: BodyFormat, body: &[u8]) -> Result<Value, IngestError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Map(Default::default()));
    }
    let value = match format {
        BodyFormat::Json => json::decode(body)?,
        BodyFormat::Form => form::decode(body),
        BodyFormat::Yaml => yaml::decode(body)?,
    };
    tracing::debug!(format = %format, bytes = body.len(), "decoded request body");
    Ok(value)
}

/// Decode a URL query string (with or without the leading `?`).
pub fn decode_query(query: &str) -> Value {
    form::decode(query.strip_prefix('?').unwrap_or(query).as_bytes())
}
