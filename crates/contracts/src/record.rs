//! EventRecord - opaque batch payload
//!
//! Records are JSON objects passed through to the chosen target unmodified.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ContractError;

/// Opaque event record: string keys mapped to arbitrary JSON values.
///
/// The splitter never inspects or mutates payload content; it only clones
/// the record into the dispatch call for the chosen target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord(Map<String, Value>);

impl EventRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON value
    ///
    /// # Errors
    /// Returns a parse error when the value is not a JSON object.
    pub fn from_value(value: Value) -> Result<Self, ContractError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ContractError::config_parse(format!(
                "event record must be a JSON object, got: {other}"
            ))),
        }
    }

    /// Parse a record from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ContractError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ContractError::config_parse(format!("record parse error: {e}")))?;
        Self::from_value(value)
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the record contains a top-level field
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Set a top-level field (builder-style, mainly for tests)
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for EventRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_object() {
        let record = EventRecord::from_value(json!({"id": 7, "body": "hello"})).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("id"), Some(&json!(7)));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let result = EventRecord::from_value(json!([1, 2, 3]));
        assert!(result.is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let record = EventRecord::from_json(r#"{"messageId": "m-1", "attempt": 1}"#).unwrap();
        let serialized = serde_json::to_string(&record).unwrap();
        let back = EventRecord::from_json(&serialized).unwrap();
        assert_eq!(record, back);
    }
}
