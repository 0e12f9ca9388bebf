//! Firestore REST wire types.
//!
//! Every value travels as a single-key JSON object naming its type:
//!
//! ```json
//! {"integerValue": "3"}
//! {"arrayValue": {"values": [{"stringValue": "a"}]}}
//! {"mapValue": {"fields": {"x": {"nullValue": null}}}}
//! ```
//!
//! The types here (de)serialize to exactly that shape through serde's
//! externally tagged enum representation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A document's encoded field set: field name → wire value.
pub type EncodedFields = BTreeMap<String, EncodedValue>;

/// Tagged-union wire value. Exactly one variant is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EncodedValue {
    #[serde(rename = "nullValue")]
    Null(()),
    #[serde(rename = "booleanValue")]
    Boolean(bool),
    /// Decimal string, so 64-bit integers survive JSON number handling.
    #[serde(rename = "integerValue")]
    Integer(String),
    /// Non-finite values travel as the strings `"NaN"`, `"Infinity"`, `"-Infinity"`.
    #[serde(rename = "doubleValue")]
    Double(#[serde(with = "double")] f64),
    #[serde(rename = "timestampValue")]
    Timestamp(String),
    #[serde(rename = "stringValue")]
    String(String),
    #[serde(rename = "arrayValue")]
    Array(ArrayValue),
    #[serde(rename = "mapValue")]
    Map(MapValue),
}

impl EncodedValue {
    /// Wire name of the populated variant. Traced per field by `RestStore`.
    pub fn kind(&self) -> &'static str {
        match self {
            EncodedValue::Null(()) => "nullValue",
            EncodedValue::Boolean(_) => "booleanValue",
            EncodedValue::Integer(_) => "integerValue",
            EncodedValue::Double(_) => "doubleValue",
            EncodedValue::Timestamp(_) => "timestampValue",
            EncodedValue::String(_) => "stringValue",
            EncodedValue::Array(_) => "arrayValue",
            EncodedValue::Map(_) => "mapValue",
        }
    }
}

/// Payload of `arrayValue`. Firestore omits `values` for an empty array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    #[serde(default)]
    pub values: Vec<EncodedValue>,
}

/// Payload of `mapValue`. Firestore omits `fields` for an empty map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapValue {
    #[serde(default)]
    pub fields: EncodedFields,
}

/// Request body for document create/patch calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteRequest {
    pub fields: EncodedFields,
}

/// A document as returned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: EncodedFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
}

impl Document {
    /// Last path segment of `name`, i.e. the document id.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or("")
    }
}

/// `doubleValue` payload codec: JSON numbers for finite values, Firestore's
/// string spellings otherwise.
mod double {
    use serde::de::{Error, Unexpected};
    use serde::{Deserialize, Deserializer, Serializer};

    const EXPECTED: &str = "a number, \"NaN\", \"Infinity\" or \"-Infinity\"";

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value == f64::INFINITY {
            serializer.serialize_str("Infinity")
        } else if *value == f64::NEG_INFINITY {
            serializer.serialize_str("-Infinity")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    // Goes through `serde_json::Value` so numbers read correctly under
    // `arbitrary_precision`.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| D::Error::invalid_value(Unexpected::Other("number"), &EXPECTED)),
            serde_json::Value::String(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::invalid_value(Unexpected::Str(other), &EXPECTED)),
            },
            serde_json::Value::Null => Err(D::Error::invalid_type(Unexpected::Unit, &EXPECTED)),
            serde_json::Value::Bool(b) => Err(D::Error::invalid_type(Unexpected::Bool(b), &EXPECTED)),
            serde_json::Value::Array(_) => Err(D::Error::invalid_type(Unexpected::Seq, &EXPECTED)),
            serde_json::Value::Object(_) => Err(D::Error::invalid_type(Unexpected::Map, &EXPECTED)),
        }
    }
}
