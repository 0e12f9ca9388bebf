//! Value Encoder — converts untyped values into the Firestore wire format.
//!
//! Dispatch is by variant, checked in this order:
//!
//! - **Null** → `nullValue`
//! - **Bool** → `booleanValue`
//! - **Integer** → `integerValue` carrying the decimal string (no precision loss)
//! - **Float** → `doubleValue`
//! - **Text** → `timestampValue` if [`looks_like_timestamp`] says so, else `stringValue`
//! - **Array** → `arrayValue`, element order preserved
//! - **Map** → `mapValue`, same key set
//! - **Other** → `stringValue` with the carried textual rendering
//!
//! Encoding is pure and cannot fail. The input is an owned tree, so there is
//! no cycle to guard against.
//!
//! # Example
//! ```
//! use docseed_core::{encode, EncodedValue, Fields, Value};
//!
//! let mut fields = Fields::new();
//! fields.insert("count".to_string(), Value::Integer(3));
//! fields.insert("appliedAt".to_string(), Value::from("2025-09-17T05:00:00Z"));
//!
//! let encoded = encode(&fields);
//! assert_eq!(encoded["count"], EncodedValue::Integer("3".to_string()));
//! assert_eq!(
//!     encoded["appliedAt"],
//!     EncodedValue::Timestamp("2025-09-17T05:00:00Z".to_string())
//! );
//! ```

use crate::timestamp::looks_like_timestamp;
use crate::value::{Fields, Value};
use crate::wire::{ArrayValue, EncodedFields, EncodedValue, MapValue};
use std::collections::BTreeMap;

/// Encode a document's field set. This is the map branch applied at the
/// root: the result is the `fields` object of a write request.
pub fn encode(fields: &Fields) -> EncodedFields {
    encode_map(fields)
}

/// Encode a single value.
pub fn encode_value(value: &Value) -> EncodedValue {
    match value {
        Value::Null => EncodedValue::Null(()),
        Value::Bool(b) => EncodedValue::Boolean(*b),
        Value::Integer(n) => EncodedValue::Integer(n.to_string()),
        Value::Float(f) => EncodedValue::Double(*f),
        Value::Text(s) => encode_text(s),
        Value::Array(items) => EncodedValue::Array(ArrayValue {
            values: items.iter().map(encode_value).collect(),
        }),
        Value::Map(map) => EncodedValue::Map(MapValue {
            fields: encode_map(map),
        }),
        Value::Other(rendered) => EncodedValue::String(rendered.clone()),
    }
}

fn encode_text(text: &str) -> EncodedValue {
    if looks_like_timestamp(text) {
        EncodedValue::Timestamp(text.to_string())
    } else {
        EncodedValue::String(text.to_string())
    }
}

fn encode_map(map: &BTreeMap<String, Value>) -> EncodedFields {
    map.iter()
        .map(|(key, value)| (key.clone(), encode_value(value)))
        .collect()
}
