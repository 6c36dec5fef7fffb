//! Typed field values: JSON payload decoding and coercion of raw column text.

use crate::catalog::{Field, FieldType};
use crate::error::ValidationError;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One application-level value. Serializes to the matching JSON scalar.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Caller-supplied field/value mapping for create and update.
pub type Payload = BTreeMap<String, FieldValue>;

/// One row, keyed by column name.
pub type Record = BTreeMap<String, FieldValue>;

impl FieldValue {
    /// Decode one JSON value. Booleans, arrays and objects have no field kind and are rejected.
    pub fn from_json(field: &str, v: &Value) -> Result<Self, ValidationError> {
        Ok(match v {
            Value::Null => FieldValue::Null,
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    FieldValue::Float(f)
                } else {
                    return Err(ValidationError::InvalidType(field.to_string()));
                }
            }
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
                return Err(ValidationError::InvalidType(field.to_string()))
            }
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text form sent to the database; `None` is SQL NULL.
    pub fn to_sql_text(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
        }
    }
}

/// A float with no fractional part that fits in `i64`.
pub(crate) fn whole_i64(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Decode a JSON request body into a payload.
pub fn decode_payload(body: Value) -> Result<Payload, ValidationError> {
    let Value::Object(map) = body else {
        return Err(ValidationError::NotAnObject);
    };
    map.iter()
        .map(|(k, v)| FieldValue::from_json(k, v).map(|fv| (k.clone(), fv)))
        .collect()
}

/// Convert a raw column value into a typed value according to its field.
/// Unparsable numbers degrade to the raw string instead of failing the read.
pub fn coerce(field: &Field, raw: Option<&str>) -> FieldValue {
    let Some(raw) = raw else {
        return FieldValue::Null;
    };
    if field.nullable && raw.is_empty() {
        return FieldValue::Null;
    }
    match field.field_type {
        FieldType::Integer => raw
            .parse::<i64>()
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::Text(raw.to_string())),
        FieldType::FloatingPoint => match raw.parse::<f64>() {
            Ok(f) if f.is_finite() => FieldValue::Float(f),
            _ => FieldValue::Text(raw.to_string()),
        },
        FieldType::Text => FieldValue::Text(raw.to_string()),
    }
}
