use oembed_types::FieldMap;
use serde_json::Value;

use super::{DecodeError, body_preview};

/// Decode a JSON reply. The top-level value must be an object.
pub fn decode_json(body: &[u8]) -> Result<FieldMap, DecodeError> {
    let value = serde_json::from_slice::<Value>(body).map_err(|source| DecodeError::Json {
        source,
        body_preview: body_preview(body),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(DecodeError::NotAnObject {
            found: json_type_name(&other),
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
