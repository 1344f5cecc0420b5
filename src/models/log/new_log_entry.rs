//! Insert payload with every field resolved to a concrete value.

use serde_json::{Map, Value};

pub const DEFAULT_LEVEL: &str = "info";
pub const DEFAULT_MESSAGE: &str = "";
pub const DEFAULT_SERVICE: &str = "unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub level: String,
    pub message: String,
    pub service: String,
    /// Always a JSON object.
    pub data: Value,
}

impl Default for NewLogEntry {
    fn default() -> Self {
        NewLogEntry {
            level: DEFAULT_LEVEL.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            service: DEFAULT_SERVICE.to_string(),
            data: Value::Object(Map::new()),
        }
    }
}

impl NewLogEntry {
    /// Resolve a request body into an insertable entry.
    ///
    /// Nothing here is rejected. Fields that are missing or of the wrong JSON
    /// type take their default, unknown fields are ignored, and a body that is
    /// not an object yields an all-default entry. `level` also falls back when
    /// it is an empty string.
    pub fn from_json(body: &Value) -> Self {
        let Some(obj) = body.as_object() else {
            return NewLogEntry::default();
        };
        let text = |key: &str| obj.get(key).and_then(Value::as_str);

        NewLogEntry {
            level: text("level")
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_LEVEL)
                .to_string(),
            message: text("message").unwrap_or(DEFAULT_MESSAGE).to_string(),
            service: text("service").unwrap_or(DEFAULT_SERVICE).to_string(),
            data: obj
                .get("data")
                .filter(|v| v.is_object())
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}
