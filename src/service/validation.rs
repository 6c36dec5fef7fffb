//! Payload validation against a table's catalog entry.

use crate::catalog::{Field, FieldType, Table};
use crate::error::ValidationError;
use crate::value::{whole_i64, FieldValue, Payload};

pub struct RequestValidator;

impl RequestValidator {
    /// Every required non-primary field must be present. A primary key in the payload is ignored.
    pub fn validate_create(table: &Table, payload: &Payload) -> Result<(), ValidationError> {
        for field in table.non_primary_fields() {
            match payload.get(&field.name) {
                None if !field.nullable => {
                    return Err(ValidationError::FieldRequired(field.name.clone()))
                }
                None => {}
                Some(v) => validate_field(field, v)?,
            }
        }
        for name in payload.keys() {
            if table.field(name).is_none() {
                return Err(ValidationError::UnknownField(name.clone()));
            }
        }
        Ok(())
    }

    /// Only supplied keys are checked. The primary key may never be updated.
    pub fn validate_update(table: &Table, payload: &Payload) -> Result<(), ValidationError> {
        if payload.is_empty() {
            return Err(ValidationError::NoFields);
        }
        for (name, v) in payload {
            let field = table
                .field(name)
                .ok_or_else(|| ValidationError::UnknownField(name.clone()))?;
            if field.is_primary {
                return Err(ValidationError::InvalidType(field.name.clone()));
            }
            validate_field(field, v)?;
        }
        Ok(())
    }
}

fn validate_field(field: &Field, v: &FieldValue) -> Result<(), ValidationError> {
    if v.is_null() {
        if field.nullable {
            return Ok(());
        }
        return Err(ValidationError::InvalidType(field.name.clone()));
    }
    if !kind_matches(field.field_type, v) {
        return Err(ValidationError::InvalidType(field.name.clone()));
    }
    Ok(())
}

/// Whole floats count as integers; integers widen to floating point.
fn kind_matches(field_type: FieldType, v: &FieldValue) -> bool {
    match (field_type, v) {
        (FieldType::Integer, FieldValue::Integer(_)) => true,
        (FieldType::Integer, FieldValue::Float(f)) => whole_i64(*f).is_some(),
        (FieldType::FloatingPoint, FieldValue::Float(_) | FieldValue::Integer(_)) => true,
        (FieldType::Text, FieldValue::Text(_)) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_catalog;
    use crate::value::decode_payload;
    use serde_json::json;

    fn users() -> Table {
        sample_catalog().table("users").cloned().unwrap()
    }

    fn payload(v: serde_json::Value) -> Payload {
        decode_payload(v).unwrap()
    }

    #[test]
    fn create_accepts_missing_nullable_field() {
        assert!(RequestValidator::validate_create(&users(), &payload(json!({"name": "Alice"}))).is_ok());
    }

    #[test]
    fn create_requires_non_nullable_field() {
        assert_eq!(
            RequestValidator::validate_create(&users(), &payload(json!({"age": 3}))),
            Err(ValidationError::FieldRequired("name".into()))
        );
    }

    #[test]
    fn create_rejects_null_for_required_field() {
        assert_eq!(
            RequestValidator::validate_create(&users(), &payload(json!({"name": null}))),
            Err(ValidationError::InvalidType("name".into()))
        );
    }

    #[test]
    fn create_allows_null_for_nullable_field() {
        let p = payload(json!({"name": "Alice", "age": null}));
        assert!(RequestValidator::validate_create(&users(), &p).is_ok());
    }

    #[test]
    fn create_rejects_kind_mismatch() {
        assert_eq!(
            RequestValidator::validate_create(&users(), &payload(json!({"name": 5}))),
            Err(ValidationError::InvalidType("name".into()))
        );
        assert_eq!(
            RequestValidator::validate_create(&users(), &payload(json!({"name": "A", "age": "3"}))),
            Err(ValidationError::InvalidType("age".into()))
        );
        assert_eq!(
            RequestValidator::validate_create(&users(), &payload(json!({"name": "A", "age": 3.5}))),
            Err(ValidationError::InvalidType("age".into()))
        );
    }

    #[test]
    fn whole_float_satisfies_integer_field() {
        let p = payload(json!({"name": "A", "age": 30.0}));
        assert!(RequestValidator::validate_create(&users(), &p).is_ok());
    }

    #[test]
    fn integer_satisfies_floating_field() {
        let table = Table::new(
            "public",
            "prices",
            vec![Field::new("amount", FieldType::FloatingPoint, false, false)],
        );
        assert!(RequestValidator::validate_create(&table, &payload(json!({"amount": 3}))).is_ok());
        assert!(RequestValidator::validate_update(&table, &payload(json!({"amount": 3.25}))).is_ok());
    }

    #[test]
    fn create_rejects_unknown_field_even_when_rest_is_valid() {
        assert_eq!(
            RequestValidator::validate_create(&users(), &payload(json!({"name": "A", "email": "a@b"}))),
            Err(ValidationError::UnknownField("email".into()))
        );
    }

    #[test]
    fn create_ignores_primary_key() {
        let p = payload(json!({"id": "not-a-number", "name": "A"}));
        assert!(RequestValidator::validate_create(&users(), &p).is_ok());
    }

    #[test]
    fn update_always_rejects_primary_key() {
        for id in [json!(1), json!(null), json!("x")] {
            assert_eq!(
                RequestValidator::validate_update(&users(), &payload(json!({"id": id}))),
                Err(ValidationError::InvalidType("id".into()))
            );
        }
    }

    #[test]
    fn update_checks_only_supplied_fields() {
        assert!(RequestValidator::validate_update(&users(), &payload(json!({"age": 30}))).is_ok());
        assert_eq!(
            RequestValidator::validate_update(&users(), &payload(json!({"name": null}))),
            Err(ValidationError::InvalidType("name".into()))
        );
        assert_eq!(
            RequestValidator::validate_update(&users(), &payload(json!({"nickname": "x"}))),
            Err(ValidationError::UnknownField("nickname".into()))
        );
    }

    #[test]
    fn update_rejects_empty_payload() {
        assert_eq!(
            RequestValidator::validate_update(&users(), &Payload::new()),
            Err(ValidationError::NoFields)
        );
    }
}
