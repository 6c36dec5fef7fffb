//! Schema-driven CRUD over any catalog table.

use crate::catalog::{Catalog, Field, FieldType, Table};
use crate::error::AppError;
use crate::service::{RawRow, RequestValidator, SqlExecutor};
use crate::sql::{delete, insert, select_by_id, select_list, update};
use crate::value::{coerce, whole_i64, FieldValue, Payload, Record};
use std::sync::Arc;

/// One statement per operation (update adds an existence read). Holds no locks;
/// the catalog is immutable and the executor is shared.
#[derive(Clone)]
pub struct CrudEngine {
    executor: Arc<dyn SqlExecutor>,
    catalog: Arc<Catalog>,
}

impl CrudEngine {
    pub fn new(executor: Arc<dyn SqlExecutor>, catalog: Arc<Catalog>) -> Self {
        CrudEngine { executor, catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list_tables(&self) -> &[String] {
        self.catalog.tables()
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.catalog.has_table(name)
    }

    fn table(&self, name: &str) -> Result<&Table, AppError> {
        self.catalog
            .table(name)
            .ok_or_else(|| AppError::TableNotFound(name.to_string()))
    }

    /// The primary field, provided `id` could be one of its values. No row can hold a key
    /// outside the column's range, so that is RecordNotFound without a round trip.
    fn primary<'t>(table: &'t Table, id: &FieldValue) -> Result<&'t Field, AppError> {
        let pk = table.primary_field().ok_or(AppError::RecordNotFound)?;
        if !key_fits(pk, id) {
            return Err(AppError::RecordNotFound);
        }
        Ok(pk)
    }

    pub fn validate_for_create(&self, table: &str, payload: &Payload) -> Result<(), AppError> {
        RequestValidator::validate_create(self.table(table)?, payload)?;
        Ok(())
    }

    pub fn validate_for_update(&self, table: &str, payload: &Payload) -> Result<(), AppError> {
        RequestValidator::validate_update(self.table(table)?, payload)?;
        Ok(())
    }

    /// Offset and limit are passed through; the database rejects values it cannot use.
    pub async fn list_records(&self, table: &str, offset: i64, limit: i64) -> Result<Vec<Record>, AppError> {
        let table = self.table(table)?;
        let q = select_list(table, offset, limit);
        let rows = self.executor.query(&q.sql, &q.params).await?;
        Ok(rows.iter().map(|r| to_record(table, r)).collect())
    }

    pub async fn get_record(&self, table: &str, id: &FieldValue) -> Result<Record, AppError> {
        let table = self.table(table)?;
        let pk = Self::primary(table, id)?;
        let q = select_by_id(table, pk, id);
        let row = self
            .executor
            .query_row(&q.sql, &q.params)
            .await?
            .ok_or(AppError::RecordNotFound)?;
        Ok(to_record(table, &row))
    }

    /// Insert one row. Returns the new primary key, or null for a table without one.
    pub async fn create_record(&self, table: &str, payload: &Payload) -> Result<FieldValue, AppError> {
        let table = self.table(table)?;
        RequestValidator::validate_create(table, payload)?;
        let q = insert(table, payload);
        let Some(pk) = table.primary_field() else {
            self.executor.exec(&q.sql, &q.params).await?;
            return Ok(FieldValue::Null);
        };
        let row = self
            .executor
            .query_row(&q.sql, &q.params)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))?;
        let raw = row
            .get(&pk.name)
            .ok_or_else(|| AppError::Db(sqlx::Error::ColumnNotFound(pk.name.clone())))?;
        Ok(coerce(pk, raw))
    }

    /// The row must exist first; a missing row fails without issuing the UPDATE.
    pub async fn update_record(
        &self,
        table_name: &str,
        id: &FieldValue,
        payload: &Payload,
    ) -> Result<u64, AppError> {
        let table = self.table(table_name)?;
        RequestValidator::validate_update(table, payload)?;
        self.get_record(table_name, id).await?;
        let pk = Self::primary(table, id)?;
        let q = update(table, pk, id, payload);
        let affected = self.executor.exec(&q.sql, &q.params).await?;
        Ok(affected)
    }

    /// Zero affected rows is RecordNotFound, same as update.
    pub async fn delete_record(&self, table: &str, id: &FieldValue) -> Result<u64, AppError> {
        let table = self.table(table)?;
        let pk = Self::primary(table, id)?;
        let q = delete(table, pk, id);
        let affected = self.executor.exec(&q.sql, &q.params).await?;
        if affected == 0 {
            return Err(AppError::RecordNotFound);
        }
        Ok(affected)
    }

    /// Round trip to the database for readiness checks.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.executor.exec("SELECT 1", &[]).await?;
        Ok(())
    }
}

/// Integer keys must be whole and within the declared width (`int2`, `int4`, else 64-bit).
fn key_fits(pk: &Field, id: &FieldValue) -> bool {
    if pk.field_type != FieldType::Integer {
        return true;
    }
    let n = match id {
        FieldValue::Integer(i) => Some(*i),
        FieldValue::Float(f) => whole_i64(*f),
        FieldValue::Text(s) => s.trim().parse().ok(),
        FieldValue::Null => None,
    };
    let Some(n) = n else { return false };
    match pk.sql_type.as_str() {
        "int2" | "smallint" => i16::try_from(n).is_ok(),
        "int4" | "int" | "integer" => i32::try_from(n).is_ok(),
        _ => true,
    }
}

fn to_record(table: &Table, row: &RawRow) -> Record {
    row.cells
        .iter()
        .map(|cell| {
            let value = match table.field(&cell.name) {
                Some(field) => coerce(field, cell.value.as_deref()),
                None => cell
                    .value
                    .clone()
                    .map(FieldValue::Text)
                    .unwrap_or(FieldValue::Null),
            };
            (cell.name.clone(), value)
        })
        .collect()
}
