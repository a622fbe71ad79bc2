use fieldguard_core::Value;

use crate::error::IngestError;

pub(crate) fn decode(body: &[u8]) -> Result<Value, IngestError> {
    let json: serde_json::Value = serde_json::from_slice(body)?;
    if !json.is_object() {
        return Err(IngestError::NotAnObject {
            found: json_type(&json),
        });
    }
    Ok(Value::from(json))
}

fn json_type(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_root_is_accepted() {
        let v = decode(br#"{"user": {"id": 7}, "tags": ["a"]}"#).unwrap();
        assert!(matches!(v, Value::Map(ref m) if m.len() == 2));
    }

    #[test]
    fn array_root_is_rejected() {
        let err = decode(b"[1, 2]").unwrap_err();
        assert!(matches!(err, IngestError::NotAnObject { found: "array" }));
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(decode(b"{\"a\":").unwrap_err(), IngestError::Json(_)));
    }
}
