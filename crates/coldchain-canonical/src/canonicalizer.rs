use canonical_json::to_string;
use serde_json::Value;
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// The encoder rejected the value.
    #[error("canonical encoding failed: {0}")]
    Encoding(String),
}

/// JSON path used in error messages.
#[derive(Debug, Clone, Default)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn child(&self, segment: String) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Produces RFC 8785 canonical bytes for ledger records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Returns the canonical UTF-8 bytes for `value`.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        Self::check_numbers(value, Path::default())?;
        let canonical =
            to_string(value).map_err(|err| CanonicalizationError::Encoding(err.to_string()))?;
        Ok(canonical.into_bytes())
    }

    fn check_numbers(value: &Value, path: Path) -> Result<(), CanonicalizationError> {
        match value {
            Value::Object(map) => map
                .iter()
                .try_for_each(|(key, child)| Self::check_numbers(child, path.child(key.clone()))),
            Value::Array(items) => items.iter().enumerate().try_for_each(|(idx, item)| {
                Self::check_numbers(item, path.child(format!("[{}]", idx)))
            }),
            Value::Number(num) => match num.as_f64() {
                Some(f) if !f.is_finite() => {
                    Err(CanonicalizationError::NonFiniteNumber(path.to_string()))
                }
                _ => Ok(()),
            },
            Value::String(_) | Value::Bool(_) | Value::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_and_whitespace_dropped() {
        let bytes = Canonicalizer::new()
            .canonicalize(&json!({ "b": 1, "a": [true, null] }))
            .unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"a":[true,null],"b":1}"#);
    }

    #[test]
    fn equal_values_give_equal_bytes() {
        let c = Canonicalizer::new();
        let left = c.canonicalize(&json!({ "x": "1", "y": { "z": 2 } })).unwrap();
        let right = c.canonicalize(&json!({ "y": { "z": 2 }, "x": "1" })).unwrap();
        assert_eq!(left, right);
    }
}
