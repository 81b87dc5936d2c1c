//! Field value types for documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single field value in a document.
///
/// Only [`FieldValue::Text`] fields are analyzed and indexed; every variant
/// is captured in the record's data snapshot and survives reconstruction
/// unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text content (analyzed and indexed)
    Text(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Date/time value
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Get the text content if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the integer content if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the float content if this is a float value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Get the boolean content if this is a boolean value.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Check whether this value is indexable text.
    pub fn is_text(&self) -> bool {
        matches!(self, FieldValue::Text(_))
    }

    /// Name of this value's type (for error messages).
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::DateTime(_) => "datetime",
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{text}"),
            FieldValue::Integer(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Boolean(value) => write!(f, "{value}"),
            FieldValue::DateTime(value) => write!(f, "{}", value.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text() {
        let value = FieldValue::Text("hello".to_string());
        assert_eq!(value.as_text(), Some("hello"));
        assert!(value.is_text());

        let value = FieldValue::Integer(7);
        assert_eq!(value.as_text(), None);
        assert!(!value.is_text());
    }

    #[test]
    fn test_type_name() {
        assert_eq!(FieldValue::Boolean(true).type_name(), "boolean");
        assert_eq!(FieldValue::Float(1.5).type_name(), "float");
    }

    #[test]
    fn test_serde_round_trip() {
        let value = FieldValue::Text("snapshot".to_string());
        let bytes = bincode::serialize(&value).unwrap();
        let back: FieldValue = bincode::deserialize(&bytes).unwrap();
        assert_eq!(value, back);
    }
}
