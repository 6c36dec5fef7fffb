//! Build the catalog from live schema introspection.

use crate::catalog::types::{Catalog, Field, FieldType, Table};
use crate::error::CatalogError;
use crate::service::{RawRow, SqlExecutor};
use crate::value::FieldValue;

const LIST_TABLES: &str = "SELECT table_name::text AS table_name \
     FROM information_schema.tables \
     WHERE table_schema::text = $1 AND table_type = 'BASE TABLE' \
     ORDER BY table_name";

/// Name, declared type and its schema, nullability (`YES`/`NO`) and key role (`PRI` or empty),
/// in column order.
const LIST_COLUMNS: &str = "SELECT c.column_name::text AS column_name, \
     c.udt_name::text AS column_type, \
     c.udt_schema::text AS column_type_schema, \
     c.is_nullable::text AS is_nullable, \
     CASE WHEN pk.column_name IS NULL THEN '' ELSE 'PRI' END AS column_key \
     FROM information_schema.columns c \
     LEFT JOIN ( \
         SELECT kcu.column_name::text AS column_name \
         FROM information_schema.table_constraints tc \
         JOIN information_schema.key_column_usage kcu \
           ON kcu.constraint_name = tc.constraint_name \
          AND kcu.table_schema = tc.table_schema \
          AND kcu.table_name = tc.table_name \
         WHERE tc.constraint_type = 'PRIMARY KEY' \
           AND tc.table_schema::text = $1 AND tc.table_name::text = $2 \
     ) pk ON pk.column_name = c.column_name::text \
     WHERE c.table_schema::text = $1 AND c.table_name::text = $2 \
     ORDER BY c.ordinal_position";

const BUILTIN_TYPE_SCHEMA: &str = "pg_catalog";

/// One row of the column-listing query.
#[derive(Clone, Debug)]
struct ColumnRow {
    name: String,
    declared_type: String,
    type_schema: String,
    nullable: bool,
    primary: bool,
}

impl ColumnRow {
    fn from_raw(table: &str, row: &RawRow) -> Result<Self, CatalogError> {
        let text = |column: &'static str| {
            row.get(column)
                .map(|v| v.unwrap_or_default().to_string())
                .ok_or_else(|| CatalogError::MalformedRow {
                    table: table.to_string(),
                    column,
                })
        };
        Ok(ColumnRow {
            name: text("column_name")?,
            declared_type: text("column_type")?,
            type_schema: text("column_type_schema")?,
            nullable: text("is_nullable")? == "YES",
            primary: text("column_key")? == "PRI",
        })
    }

    fn into_field(self) -> Field {
        let field = Field::new(self.name, FieldType::infer(&self.declared_type), self.nullable, self.primary)
            .with_sql_type(self.declared_type);
        if self.type_schema.is_empty() || self.type_schema == BUILTIN_TYPE_SCHEMA {
            field
        } else {
            field.with_type_schema(self.type_schema)
        }
    }
}

/// Load every base table of `schema`. Any failure aborts the load; there is no partial catalog.
pub async fn load_catalog(executor: &dyn SqlExecutor, schema: &str) -> Result<Catalog, CatalogError> {
    let schema_param = FieldValue::Text(schema.to_string());
    let table_rows = executor.query(LIST_TABLES, &[schema_param.clone()]).await?;

    let mut tables = Vec::with_capacity(table_rows.len());
    for row in &table_rows {
        let name = row
            .get("table_name")
            .flatten()
            .ok_or_else(|| CatalogError::MalformedRow {
                table: String::new(),
                column: "table_name",
            })?
            .to_string();
        let column_rows = executor
            .query(LIST_COLUMNS, &[schema_param.clone(), FieldValue::Text(name.clone())])
            .await?;
        let mut fields = Vec::with_capacity(column_rows.len());
        for raw in &column_rows {
            fields.push(ColumnRow::from_raw(&name, raw)?.into_field());
        }
        let key_columns = fields.iter().filter(|f| f.is_primary).count();
        if key_columns > 1 {
            tracing::warn!(table = %name, key_columns, "composite primary key; using the first key column only");
        }
        tables.push(Table::new(schema, name, fields));
    }

    let catalog = Catalog::new(tables);
    tracing::info!(schema = %schema, tables = catalog.tables().len(), "schema catalog loaded");
    Ok(catalog)
}
