//! Value Decoder — converts Firestore wire values back into untyped values.
//!
//! The inverse of the encoder, used to read stored documents and to check
//! that integers survive the decimal-string round trip. `timestampValue`
//! comes back as plain text, which the encoder classifies as a timestamp
//! again, so `decode(encode(v)) == v` for any `v` without `Other` leaves.

use crate::error::{DocseedError, Result};
use crate::value::{Fields, Value};
use crate::wire::{EncodedFields, EncodedValue};

/// Decode an encoded field set.
pub fn decode(fields: &EncodedFields) -> Result<Fields> {
    fields
        .iter()
        .map(|(key, value)| -> Result<(String, Value)> {
            Ok((key.clone(), decode_value(value)?))
        })
        .collect()
}

/// Decode a single wire value.
///
/// Fails only when an `integerValue` payload is not a valid `i64`.
pub fn decode_value(value: &EncodedValue) -> Result<Value> {
    Ok(match value {
        EncodedValue::Null(()) => Value::Null,
        EncodedValue::Boolean(b) => Value::Bool(*b),
        EncodedValue::Integer(digits) => Value::Integer(
            digits
                .parse::<i64>()
                .map_err(|_| DocseedError::InvalidInteger(digits.clone()))?,
        ),
        EncodedValue::Double(f) => Value::Float(*f),
        EncodedValue::Timestamp(s) | EncodedValue::String(s) => Value::Text(s.clone()),
        EncodedValue::Array(array) => Value::Array(
            array
                .values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        EncodedValue::Map(map) => Value::Map(decode(&map.fields)?),
    })
}
