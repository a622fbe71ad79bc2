use fieldguard_core::Value;

use crate::error::IngestError;

/// Mappings keep integer and boolean keys; the validator rejects them only
/// if traversal reaches them.
pub(crate) fn decode(body: &[u8]) -> Result<Value, IngestError> {
    let yaml: serde_yaml::Value = serde_yaml::from_slice(body)?;
    if yaml.is_null() {
        return Ok(Value::Map(Default::default()));
    }
    let value = Value::try_from(yaml)?;
    if !matches!(value, Value::Map(_)) {
        return Err(IngestError::NotAnObject {
            found: value.type_name(),
        });
    }
    Ok(value)
}
