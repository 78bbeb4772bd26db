//! Loosely-typed nested fields.
//!
//! Structured columns (score maps, metadata blobs) sometimes arrive already
//! decoded and sometimes as serialized JSON text. Both shapes are captured
//! here and normalized exactly once, at the point of use.

use serde_json::{Map, Value};

/// A nested field as delivered by the remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Serialized text that still needs a parse step.
    Raw(String),
    /// An already-decoded structure.
    Parsed(Value),
}

impl FieldValue {
    /// Capture a raw JSON value. `null` means the field is absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(text) => Some(Self::Raw(text.clone())),
            other => Some(Self::Parsed(other.clone())),
        }
    }

    /// Look up `field` on a row and capture it.
    pub fn from_row(row: &Value, field: &str) -> Option<Self> {
        row.get(field).and_then(Self::from_json)
    }

    /// Decode into a JSON value. Unparseable text is treated as absent.
    pub fn normalize(self) -> Option<Value> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Raw(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Null) => None,
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(error = %e, "unparseable nested field treated as absent");
                    None
                }
            },
        }
    }

    /// Decode into a JSON object, or `None` if it is anything else.
    pub fn into_object(self) -> Option<Map<String, Value>> {
        match self.normalize()? {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Decode into a JSON array, or `None` if it is anything else.
    pub fn into_array(self) -> Option<Vec<Value>> {
        match self.normalize()? {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}
