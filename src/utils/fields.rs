// src/utils/fields.rs

//! Tolerant field extraction over untyped JSON objects.
//!
//! A key only counts as present when its value is "truthy": not null, not
//! `false`, not zero, not an empty string/array/object. Lookups walk an
//! ordered list of candidate keys and take the first present one.

use serde_json::Value;

use crate::models::RawRecord;

/// Whether a JSON value counts as present.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// First present value among `keys`, in order.
pub fn first_present<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| is_truthy(value))
}

/// Render a JSON value as text. Strings are taken verbatim, other values use
/// their JSON form.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Text form of a scalar value; `None` for null, arrays and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Some(to_text(value)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce a value into an integer the way a lenient parser would: integers
/// as is (sign kept), floats truncated toward zero, numeric strings parsed,
/// `true` as one.
pub fn as_count(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(true) => Some(1),
        _ => None,
    }
}
