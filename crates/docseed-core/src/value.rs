//! Untyped value tree produced by callers before encoding.
//!
//! `Value` mirrors JSON but keeps integers apart from floats, since the wire
//! format has distinct `integerValue` and `doubleValue` variants. Mappings use
//! `BTreeMap` so key order never affects the encoded output.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::timestamp::now_timestamp;

/// A document's field set: field name → value.
pub type Fields = BTreeMap<String, Value>;

/// A native, dynamically-typed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// A value of a type the document model does not know, carried as its
    /// textual rendering. Encodes as `stringValue`.
    Other(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Consumes the value, returning its fields if it is a mapping.
    pub fn into_fields(self) -> Option<Fields> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Renders the value back to JSON. `Other` becomes a JSON string and a
    /// non-finite float becomes `null`, since JSON has no room for either.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Integer(n) => Json::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Text(s) | Value::Other(s) => Json::String(s.clone()),
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => number(&n),
            Json::String(s) => Value::Text(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Classifies a JSON number by its literal text, which `arbitrary_precision`
/// keeps intact. An integer literal outside `i64` has no lossless wire
/// variant and is carried as `Other`.
fn number(n: &serde_json::Number) -> Value {
    let literal = n.to_string();
    if literal.contains(['.', 'e', 'E']) {
        match n.as_f64() {
            Some(f) => Value::Float(f),
            None => Value::Other(literal),
        }
    } else {
        match literal.parse::<i64>() {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Other(literal),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Integer(i64::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Other(n.to_string()),
        }
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Instants become text in the `…Z` form, so the encoder classifies them as
/// timestamps.
impl From<DateTime<Utc>> for Value {
    fn from(at: DateTime<Utc>) -> Self {
        Value::Text(now_timestamp(at))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::Array(iter.into_iter().map(Into::into).collect())
    }
}
