use std::fmt;

use serde::{Deserialize, Serialize};

/// A single cell value.
///
/// JSON `null` maps to [`Value::Empty`], numbers to [`Value::Number`] and
/// strings to [`Value::Text`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Value {
    /// Interprets the value as a number.
    ///
    /// Text is trimmed and thousands separators (`,`) are removed before parsing.
    /// Non-finite numbers, empty cells and unparsable text have no numeric value.
    ///
    /// # Examples
    ///
    /// ```
    /// use auditkit_sampling::Value;
    ///
    /// assert_eq!(Value::from(12.5).as_number(), Some(12.5));
    /// assert_eq!(Value::from(" -1,250.75 ").as_number(), Some(-1250.75));
    /// assert_eq!(Value::from("n/a").as_number(), None);
    /// assert_eq!(Value::Empty.as_number(), None);
    /// ```
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Value::Text(text) => {
                let cleaned = text.trim().replace(',', "");
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
            Value::Empty => None,
        }
    }

    /// Returns `true` for empty cells and whitespace-only text.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Number(_) => false,
            Value::Text(text) => text.trim().is_empty(),
            Value::Empty => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(text) => f.write_str(text),
            Value::Empty => Ok(()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_json_kinds() {
        let values: Vec<Value> = serde_json::from_str(r#"[1.5, "abc", null]"#).unwrap();
        assert_eq!(
            values,
            vec![Value::Number(1.5), Value::from("abc"), Value::Empty]
        );
    }

    #[test]
    fn test_numeric_text_parsing() {
        assert_eq!(Value::from("100").as_number(), Some(100.0));
        assert_eq!(Value::from("").as_number(), None);
        assert_eq!(Value::from("   ").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::Number(f64::INFINITY).as_number(), None);
    }

    #[test]
    fn test_blank_detection() {
        assert!(Value::Empty.is_blank());
        assert!(Value::from(" ").is_blank());
        assert!(!Value::from(0.0).is_blank());
        assert!(!Value::from("x").is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(10.0).to_string(), "10");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from("CASH").to_string(), "CASH");
        assert_eq!(Value::Empty.to_string(), "");
    }
}
