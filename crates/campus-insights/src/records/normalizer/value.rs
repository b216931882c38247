use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Scalar carried by a raw record field once it has been lifted out of JSON or CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Lifts a JSON value. Nested arrays and objects are kept as their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number.as_f64().map_or(Self::Null, Self::Number),
            Value::String(text) => Self::Text(text.clone()),
            Value::Array(_) | Value::Object(_) => Self::Text(value.to_string()),
        }
    }

    /// Text used when the value becomes a bucket label or a comparison key.
    pub fn as_key(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(flag) => flag.to_string(),
            Self::Number(number) => format_number(*number),
            Self::Text(text) => text.clone(),
        }
    }

    /// Numeric reading of the value; anything that does not start with a number is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) if number.is_finite() => Some(*number),
            Self::Text(text) => leading_number(text),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

/// A field is missing iff it is absent, null, or exactly the empty string.
///
/// `0`, `false` and whitespace-only text are present values.
pub fn is_missing(value: Option<&FieldValue>) -> bool {
    match value {
        None | Some(FieldValue::Null) => true,
        Some(FieldValue::Text(text)) => text.is_empty(),
        Some(FieldValue::Bool(_)) | Some(FieldValue::Number(_)) => false,
    }
}

/// GPA for aggregation purposes: non-numeric or absent input reads as `0`.
pub fn gpa_or_zero(value: Option<&FieldValue>) -> f64 {
    value.and_then(FieldValue::as_number).unwrap_or(0.0)
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// Parses the longest numeric prefix of `raw` (after leading whitespace), e.g. `"3.5 "` or `"3.5abc"`.
fn leading_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digit_count = end - digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        digit_count += fraction_end - fraction_start;
        if digit_count > 0 {
            end = fraction_end;
        }
    }

    if digit_count == 0 {
        return None;
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}
