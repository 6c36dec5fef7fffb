//! Builds parameterized SELECT, INSERT, UPDATE, DELETE from a catalog table.

use crate::catalog::{Field, FieldType, Table};
use crate::value::{whole_i64, FieldValue, Payload};

/// Quote identifier for PostgreSQL (safe: only from the catalog).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Cast target for a field's parameters; user-defined types are schema-qualified.
fn cast_type(field: &Field) -> String {
    match &field.type_schema {
        Some(schema) => format!("{}.{}", quoted(schema), quoted(&field.sql_type)),
        None => quoted(&field.sql_type),
    }
}

/// Full qualified table name.
fn qualified_table(table: &Table) -> String {
    format!("{}.{}", quoted(&table.schema), quoted(&table.name))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<FieldValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a value bound for `field`; returns its cast placeholder.
    fn push_for(&mut self, field: &Field, v: &FieldValue) -> String {
        self.params.push(bind_value(field, v));
        format!("${}::{}", self.params.len(), cast_type(field))
    }
}

/// Whole-valued floats bound to an integer column are sent as integers.
fn bind_value(field: &Field, v: &FieldValue) -> FieldValue {
    match (field.field_type, v) {
        (FieldType::Integer, FieldValue::Float(f)) => {
            whole_i64(*f).map(FieldValue::Integer).unwrap_or_else(|| v.clone())
        }
        _ => v.clone(),
    }
}

/// Every column as text, so rows come back as raw strings for coercion.
fn select_column_list(table: &Table) -> String {
    table
        .fields()
        .iter()
        .map(|f| {
            let q = quoted(&f.name);
            format!("{}::text AS {}", q, q)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// SELECT a page of rows. Ordered by the primary key when there is one.
/// Offset and limit go to the database unclamped.
pub fn select_list(table: &Table, offset: i64, limit: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let order_clause = table
        .primary_field()
        .map(|pk| format!(" ORDER BY {}", quoted(&pk.name)))
        .unwrap_or_default();
    q.params.push(FieldValue::Integer(limit));
    q.params.push(FieldValue::Integer(offset));
    q.sql = format!(
        "SELECT {} FROM {}{} LIMIT $1::int8 OFFSET $2::int8",
        select_column_list(table),
        qualified_table(table),
        order_clause
    );
    q
}

/// SELECT by primary key.
pub fn select_by_id(table: &Table, pk: &Field, id: &FieldValue) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_for(pk, id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(table),
        qualified_table(table),
        quoted(&pk.name),
        ph
    );
    q
}

/// INSERT every non-primary column in table order. Absent values are bound as NULL.
/// Returns the primary key as text when the table has one.
pub fn insert(table: &Table, payload: &Payload) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for f in table.non_primary_fields() {
        let val = payload.get(&f.name).unwrap_or(&FieldValue::Null);
        placeholders.push(q.push_for(f, val));
        cols.push(quoted(&f.name));
    }
    let values_clause = if cols.is_empty() {
        " DEFAULT VALUES".to_string()
    } else {
        format!(" ({}) VALUES ({})", cols.join(", "), placeholders.join(", "))
    };
    let returning = table
        .primary_field()
        .map(|pk| format!(" RETURNING {}::text AS {}", quoted(&pk.name), quoted(&pk.name)))
        .unwrap_or_default();
    q.sql = format!("INSERT INTO {}{}{}", qualified_table(table), values_clause, returning);
    q
}

/// UPDATE by primary key: SET only the non-primary columns present in the payload, in table order.
pub fn update(table: &Table, pk: &Field, id: &FieldValue, payload: &Payload) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for f in table.non_primary_fields() {
        let Some(v) = payload.get(&f.name) else { continue };
        let ph = q.push_for(f, v);
        sets.push(format!("{} = {}", quoted(&f.name), ph));
    }
    let id_ph = q.push_for(pk, id);
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        qualified_table(table),
        sets.join(", "),
        quoted(&pk.name),
        id_ph
    );
    q
}

/// DELETE by primary key.
pub fn delete(table: &Table, pk: &Field, id: &FieldValue) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_for(pk, id);
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        qualified_table(table),
        quoted(&pk.name),
        ph
    );
    q
}
