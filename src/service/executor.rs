//! The SQL-executing capability the engine and catalog loader consume.

use crate::value::FieldValue;
use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};

/// One returned column: its name and its value as nullable text.
#[derive(Clone, Debug, PartialEq)]
pub struct RawCell {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRow {
    pub cells: Vec<RawCell>,
}

impl RawRow {
    pub fn new(cells: Vec<RawCell>) -> Self {
        RawRow { cells }
    }

    /// `Some(None)` when the column is present and NULL; `None` when absent.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.cells
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_deref())
    }
}

/// Every statement the engine issues goes through here. Parameters are bound as text.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn query(&self, sql: &str, params: &[FieldValue]) -> Result<Vec<RawRow>, sqlx::Error>;

    async fn query_row(&self, sql: &str, params: &[FieldValue]) -> Result<Option<RawRow>, sqlx::Error>;

    /// Returns the affected-row count.
    async fn exec(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error>;
}

fn bind_all<'q>(sql: &'q str, params: &[FieldValue]) -> Query<'q, Postgres, PgArguments> {
    let mut query = sqlx::query(sql);
    for p in params {
        query = query.bind(p.clone());
    }
    query
}

/// Every column must decode as text; the builder selects `col::text`.
fn raw_row(row: &PgRow) -> Result<RawRow, sqlx::Error> {
    use sqlx::{Column, Row};
    let mut cells = Vec::with_capacity(row.len());
    for (i, col) in row.columns().iter().enumerate() {
        let value: Option<String> = row.try_get(i)?;
        cells.push(RawCell {
            name: col.name().to_string(),
            value,
        });
    }
    Ok(RawRow { cells })
}

#[async_trait]
impl SqlExecutor for PgPool {
    async fn query(&self, sql: &str, params: &[FieldValue]) -> Result<Vec<RawRow>, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?params, "query");
        let rows = bind_all(sql, params).fetch_all(self).await?;
        rows.iter().map(raw_row).collect()
    }

    async fn query_row(&self, sql: &str, params: &[FieldValue]) -> Result<Option<RawRow>, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?params, "query row");
        let row = bind_all(sql, params).fetch_optional(self).await?;
        row.as_ref().map(raw_row).transpose()
    }

    async fn exec(&self, sql: &str, params: &[FieldValue]) -> Result<u64, sqlx::Error> {
        tracing::debug!(sql = %sql, params = ?params, "exec");
        let result = bind_all(sql, params).execute(self).await?;
        Ok(result.rows_affected())
    }
}
