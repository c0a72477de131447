//! Core value types
//!
//! `BoundValue` is the scalar handed to the driver for each `?` placeholder.

use serde::{Deserialize, Serialize};

/// A value bound to one positional placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoundValue {
    /// SQL NULL
    Null,
    /// 64-bit integer
    Integer(i64),
    /// Double precision float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Text
    Text(String),
}

impl BoundValue {
    /// Convert a raw caller value, returning `None` when the value is absent
    ///
    /// `null` and the empty string are absent. Integers beyond `i64`, arrays
    /// and objects are kept as their exact JSON text.
    pub fn from_raw(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(BoundValue::Text(s.clone())),
            serde_json::Value::Number(n) => Some(if let Some(i) = n.as_i64() {
                BoundValue::Integer(i)
            } else if n.is_u64() {
                BoundValue::Text(n.to_string())
            } else {
                BoundValue::Float(n.as_f64().unwrap_or_default())
            }),
            serde_json::Value::Bool(b) => Some(BoundValue::Bool(*b)),
            other => Some(BoundValue::Text(other.to_string())),
        }
    }

    /// Text form used when the value is embedded in a LIKE pattern
    pub fn to_text(&self) -> String {
        match self {
            BoundValue::Null => String::new(),
            BoundValue::Integer(i) => i.to_string(),
            BoundValue::Float(f) => f.to_string(),
            BoundValue::Bool(b) => b.to_string(),
            BoundValue::Text(s) => s.clone(),
        }
    }

    /// Wrap the value in `%...%` for a substring match
    pub fn to_like_pattern(&self) -> BoundValue {
        BoundValue::Text(format!("%{}%", self.to_text()))
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        BoundValue::Text(value.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        BoundValue::Text(value)
    }
}

impl From<i64> for BoundValue {
    fn from(value: i64) -> Self {
        BoundValue::Integer(value)
    }
}

impl From<i32> for BoundValue {
    fn from(value: i32) -> Self {
        BoundValue::Integer(value.into())
    }
}

impl From<f64> for BoundValue {
    fn from(value: f64) -> Self {
        BoundValue::Float(value)
    }
}

impl From<bool> for BoundValue {
    fn from(value: bool) -> Self {
        BoundValue::Bool(value)
    }
}

impl<T: Into<BoundValue>> From<Option<T>> for BoundValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(BoundValue::Null, Into::into)
    }
}
