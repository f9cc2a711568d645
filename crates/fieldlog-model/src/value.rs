use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Runtime value of one record field.
///
/// Decimal values keep their verbatim literal text: range checks compare the
/// parsed magnitudes, but storage and text output always echo the original
/// string, so `0.50` stays `0.50` across a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Decimal(String),
    Date(NaiveDate),
    Time(NaiveTime),
}

impl Value {
    /// Short lowercase name of this value's runtime type, for messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Decimal(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Decimal(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{d}"),
            Value::Time(t) => write!(f, "{t}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

/// Returns true if `s` is a decimal number literal: an optional minus sign
/// followed by digits with at most one decimal point (`12`, `12.`, `.5`,
/// `-0.25`). Exponents are not decimal literals.
pub fn is_decimal_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    match digits.split_once('.') {
        None => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        Some((int_part, frac_part)) => {
            int_part.bytes().all(|b| b.is_ascii_digit())
                && frac_part.bytes().all(|b| b.is_ascii_digit())
                && !(int_part.is_empty() && frac_part.is_empty())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_literals() {
        for case in ["0", "123", "0.", "0.123", ".123", "12.34"] {
            assert!(is_decimal_literal(case), "{case}");
            assert!(is_decimal_literal(&format!("-{case}")), "-{case}");
        }
        for case in [".", "-", "", "1e10", "123e", "1..", "..1", "1.2.3", "--1", "1-2"] {
            assert!(!is_decimal_literal(case), "{case}");
        }
    }

    #[test]
    fn value_serializes() {
        let value = Value::Decimal("0.50".to_string());
        let json = serde_json::to_string(&value).expect("serialize value");
        let round: Value = serde_json::from_str(&json).expect("deserialize value");
        assert_eq!(round, value);
    }
}
