use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current answers keyed by field id. A missing key means the field has no value.
pub type FieldValues = AHashMap<String, FieldValue>;

/// A field's runtime value, or the operand of a condition.
///
/// Deserialised untagged, so plain JSON (`true`, `18`, `"Car"`, `["a", "b"]`) maps
/// straight onto the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<FieldValue>),
    Null,
}

impl FieldValue {
    /// `Null` counts as "no value", the same as a missing key.
    pub fn is_present(&self) -> bool {
        !matches!(self, FieldValue::Null)
    }

    /// Numeric view used by ordering operators. Text is accepted when it parses
    /// as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if n.is_finite() => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 prints whole numbers without a fractional part at any magnitude
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::List(items) => write!(f, "{}", items.iter().join(", ")),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(f64::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}
