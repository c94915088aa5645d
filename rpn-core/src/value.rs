use crate::compat::{fmt, Vec};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

// Every operand, intermediate and result is a plain double.
// Integrality is only checked where an operation needs it (factorial).
pub type Value = f64;

// RUST CONCEPT: Strict number syntax
// Accepts an optional leading '-', digits and at most one '.', with at least
// one digit somewhere ("5", "-2.5", ".5", "5."). No exponent, no leading '+',
// no "inf"/"nan", which f64::from_str would otherwise let through.
pub fn parse_number(text: &str) -> Option<Value> {
    let body = text.strip_prefix('-').unwrap_or(text);
    if body.is_empty() {
        return None;
    }

    let mut seen_digit = false;
    let mut seen_dot = false;
    for ch in body.chars() {
        match ch {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }
    if !seen_digit {
        return None;
    }

    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Display adapter for a [`Value`].
///
/// Finite values use the shortest round-trip form (`7`, `3.5`, `-0`);
/// non-finite values render as `Infinity`, `-Infinity` and `NaN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Display(pub Value);

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        if n.is_nan() {
            write!(f, "NaN")
        } else if n.is_infinite() {
            write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
        } else {
            write!(f, "{}", n)
        }
    }
}

// RUST CONCEPT: Serde adapter for non-finite values
// JSON has no Infinity or NaN (serde_json writes them as null, which does not
// read back as f64), so they travel as the strings "Infinity", "-Infinity"
// and "NaN". Finite values stay plain numbers.
//
//     #[serde(with = "crate::value::serde_value")]
//     pub result: Value,
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerdeValue(pub Value);

impl Serialize for SerdeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let n = self.0;
        if n.is_nan() {
            serializer.serialize_str("NaN")
        } else if n.is_infinite() {
            serializer.serialize_str(if n < 0.0 { "-Infinity" } else { "Infinity" })
        } else {
            serializer.serialize_f64(n)
        }
    }
}

impl<'de> Deserialize<'de> for SerdeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor).map(SerdeValue)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = f64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or one of \"Infinity\", \"-Infinity\", \"NaN\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
        Ok(v as f64)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
        match v {
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            _ => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }
}

/// `#[serde(with = ...)]` module for a single [`Value`] field.
pub mod serde_value {
    use super::{SerdeValue, Value};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &Value, serializer: S) -> Result<S::Ok, S::Error> {
        SerdeValue(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Value, D::Error> {
        SerdeValue::deserialize(deserializer).map(|value| value.0)
    }
}

/// `#[serde(with = ...)]` module for a `Vec<Value>` field.
pub mod serde_values {
    use super::{SerdeValue, Value, Vec};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[Value], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|value| SerdeValue(*value)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
        let values = Vec::<SerdeValue>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|value| value.0).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compat::ToString;

    #[test]
    fn test_parse_number_accepts_decimals() {
        assert_eq!(parse_number("5"), Some(5.0));
        assert_eq!(parse_number("-2.5"), Some(-2.5));
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number("5."), Some(5.0));
        assert_eq!(parse_number("-0"), Some(-0.0));
    }

    #[test]
    fn test_parse_number_rejects_other_forms() {
        for text in ["", "-", ".", "-.", "1e5", "+3", "inf", "NaN", "1.2.3", "3-", "abc", "--1"] {
            assert_eq!(parse_number(text), None, "{:?} should not parse", text);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Display(7.0).to_string(), "7");
        assert_eq!(Display(3.5).to_string(), "3.5");
        assert_eq!(Display(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(Display(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Display(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_serde_value_non_finite() {
        assert_eq!(serde_json::to_string(&SerdeValue(f64::INFINITY)).unwrap(), "\"Infinity\"");
        assert_eq!(serde_json::to_string(&SerdeValue(f64::NEG_INFINITY)).unwrap(), "\"-Infinity\"");
        assert_eq!(serde_json::to_string(&SerdeValue(f64::NAN)).unwrap(), "\"NaN\"");
        assert_eq!(serde_json::to_string(&SerdeValue(2.5)).unwrap(), "2.5");

        let back: SerdeValue = serde_json::from_str("\"-Infinity\"").unwrap();
        assert_eq!(back.0, f64::NEG_INFINITY);
        let back: SerdeValue = serde_json::from_str("\"NaN\"").unwrap();
        assert!(back.0.is_nan());
        let back: SerdeValue = serde_json::from_str("7").unwrap();
        assert_eq!(back.0, 7.0);
        assert!(serde_json::from_str::<SerdeValue>("\"lots\"").is_err());
        assert!(serde_json::from_str::<SerdeValue>("null").is_err());
    }
}
