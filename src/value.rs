//! Dynamic value model shared by inputs, outputs, and schema literals.
//!
//! Values are JSON-shaped with one extension: a date-time variant, so a
//! date-typed field carries a real instant after coercion instead of the
//! string it arrived as. Absence ("undefined") is expressed as
//! `Option<Value>::None` throughout the engine, never as a variant; an
//! explicit null is `Value::Null`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

/// A dynamic value: JSON plus date-times.
///
/// Numbers are uniformly `f64`; integral JSON numbers above 2^53 lose
/// precision on conversion. Equality is structural deep equality, with
/// `f64` following IEEE semantics (`NaN != NaN`).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit floating point number
    Number(f64),
    /// UTF-8 string
    String(String),
    /// UTC instant
    DateTime(DateTime<Utc>),
    /// Ordered sequence
    Array(Vec<Value>),
    /// Key-sorted mapping
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the user-facing type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::DateTime(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns true for `Value::Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrows the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrows the number, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrows the string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Borrows the instant, if this is one.
    pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Borrows the elements, if this is an array.
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the entries, if this is an object.
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(dt: DateTime<Utc>) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Object(entries)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(entries) => Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            // Non-finite numbers have no JSON representation and become null.
            Value::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
            Value::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Object(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::DateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    /// Deserializes via the JSON data model. Strings stay strings; turning a
    /// string into a date is the coercion stage's job, never the decoder's.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(true).type_name(), "boolean");
        assert_eq!(Value::Number(1.5).type_name(), "number");
        assert_eq!(Value::String("x".into()).type_name(), "string");
        assert_eq!(Value::Array(vec![]).type_name(), "array");
        assert_eq!(Value::Object(BTreeMap::new()).type_name(), "object");
        let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(Value::DateTime(dt).type_name(), "date");
    }

    #[test]
    fn test_from_json_preserves_structure() {
        let value: Value = json!({
            "name": "Alice",
            "age": 30,
            "tags": ["a", "b"],
            "nested": { "ok": true, "nothing": null }
        })
        .into();

        let entries = value.as_object().unwrap();
        assert_eq!(entries["name"], Value::String("Alice".into()));
        assert_eq!(entries["age"], Value::Number(30.0));
        assert_eq!(
            entries["tags"],
            Value::Array(vec!["a".into(), "b".into()])
        );
        let nested = entries["nested"].as_object().unwrap();
        assert_eq!(nested["ok"], Value::Bool(true));
        assert!(nested["nothing"].is_null());
    }

    #[test]
    fn test_into_json_renders_datetime_as_rfc3339() {
        let dt = Utc.with_ymd_and_hms(2021, 6, 15, 12, 30, 0).unwrap();
        let json: serde_json::Value = Value::DateTime(dt).into();
        assert_eq!(json, json!("2021-06-15T12:30:00+00:00"));
    }

    #[test]
    fn test_non_finite_number_becomes_json_null() {
        let json: serde_json::Value = Value::Number(f64::NAN).into();
        assert_eq!(json, serde_json::Value::Null);
    }

    #[test]
    fn test_deep_equality() {
        let a: Value = json!({ "k": [1, { "x": "y" }] }).into();
        let b: Value = json!({ "k": [1, { "x": "y" }] }).into();
        let c: Value = json!({ "k": [1, { "x": "z" }] }).into();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_serde_round_trip() {
        let original: Value = json!({ "n": 1.5, "s": "text", "b": false }).into();
        let text = serde_json::to_string(&original).unwrap();
        let decoded: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_deserialize_keeps_date_strings_as_strings() {
        let decoded: Value = serde_json::from_str(r#""2020-01-01T00:00:00Z""#).unwrap();
        assert_eq!(decoded, Value::String("2020-01-01T00:00:00Z".into()));
    }
}
