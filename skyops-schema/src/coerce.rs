//! Field coercion between raw wire JSON and [`FieldValue`].
//!
//! Coercion never fails. A value that cannot be converted to its declared
//! type comes back as [`FieldValue::Raw`], untouched, and the validator
//! reports the mismatch later.

use serde_json::Value;
use skyops_types::timestamp;

use crate::schema::FieldType;
use crate::value::{FieldValue, FileRef};

// Largest integer an f64 represents exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Converts a raw wire value into a typed value for `declared`.
#[must_use]
pub fn coerce_from_wire(raw: &Value, declared: FieldType) -> FieldValue {
    let typed = match (declared, raw) {
        (FieldType::String, Value::String(s)) => Some(FieldValue::String(s.clone())),
        (FieldType::Number, Value::Number(n)) => n.as_f64().map(FieldValue::Number),
        (FieldType::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FieldValue::Number),
        (FieldType::Bool, Value::Bool(b)) => Some(FieldValue::Bool(*b)),
        (FieldType::Date, Value::String(s)) => timestamp::parse_iso(s).map(FieldValue::Date),
        (FieldType::Date, Value::Number(n)) => n
            .as_i64()
            .and_then(timestamp::from_epoch_millis)
            .map(FieldValue::Date),
        (FieldType::File, Value::String(url)) if !url.trim().is_empty() => {
            Some(FieldValue::File(FileRef::Remote(url.clone())))
        }
        _ => None,
    };

    typed.unwrap_or_else(|| FieldValue::Raw(raw.clone()))
}

/// Converts a typed value back to its wire form.
///
/// Returns `None` for file values: files never travel in the JSON body and
/// are attached as multipart content by the client instead.
#[must_use]
pub fn coerce_to_wire(value: &FieldValue) -> Option<Value> {
    match value {
        FieldValue::String(s) => Some(Value::String(s.clone())),
        FieldValue::Number(n) => Some(number_to_wire(*n)),
        FieldValue::Date(d) => Some(Value::String(timestamp::to_iso(d))),
        FieldValue::Bool(b) => Some(Value::Bool(*b)),
        FieldValue::File(_) => None,
        FieldValue::Raw(raw) => Some(raw.clone()),
    }
}

/// Integral numbers go out as JSON integers, everything else as floats.
fn number_to_wire(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INT {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
