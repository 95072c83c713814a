//! Incoming payload decoding
//!
//! Decoding happens in two steps: [`parse_object`] checks the top-level shape
//! and [`IncomingRequest::from_object`] types the fields. The credential check
//! runs between them. Context entries stay raw JSON so the window builder can
//! drop malformed ones individually.

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Decode raw input bytes into a JSON object
///
/// Empty or whitespace-only input is the same as `{}`. Anything other than
/// a JSON object is rejected.
pub fn parse_object(raw: &[u8]) -> AppResult<Map<String, Value>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    let value: Value =
        serde_json::from_slice(raw).map_err(|e| AppError::InvalidInput(e.to_string()))?;

    match value {
        Value::Object(object) => Ok(object),
        other => Err(AppError::InvalidInput(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Payload read from standard input
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IncomingRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub context: Vec<Value>,
}

impl IncomingRequest {
    /// Type `message` and `context`, defaulting absent fields
    pub fn from_object(object: Map<String, Value>) -> AppResult<Self> {
        serde_json::from_value(Value::Object(object))
            .map_err(|e| AppError::InvalidInput(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
