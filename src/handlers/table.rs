//! Table CRUD handlers: list tables, list, read, create, update, delete.

use crate::catalog::FieldType;
use crate::error::AppError;
use crate::response::Envelope;
use crate::service::CrudEngine;
use crate::state::AppState;
use crate::value::{decode_payload, FieldValue, Record};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

const DEFAULT_LIMIT: i64 = 5;

#[derive(Serialize)]
pub struct Created {
    pub id: FieldValue,
}

#[derive(Serialize)]
pub struct Updated {
    pub updated: u64,
}

#[derive(Serialize)]
pub struct Deleted {
    pub deleted: u64,
}

fn require_table(engine: &CrudEngine, table: &str) -> Result<(), AppError> {
    if engine.has_table(table) {
        Ok(())
    } else {
        Err(AppError::TableNotFound(table.to_string()))
    }
}

/// Parse the path id by the primary field's type.
fn parse_id(engine: &CrudEngine, table: &str, id_str: &str) -> Result<FieldValue, AppError> {
    let pk = engine
        .catalog()
        .primary_field(table)
        .ok_or(AppError::RecordNotFound)?;
    let expect_number = || AppError::BadRequest("invalid param: id. expect number".into());
    Ok(match pk.field_type {
        FieldType::Integer => FieldValue::Integer(id_str.parse().map_err(|_| expect_number())?),
        FieldType::FloatingPoint => FieldValue::Float(id_str.parse().map_err(|_| expect_number())?),
        FieldType::Text => FieldValue::Text(id_str.to_string()),
    })
}

pub async fn list_tables(State(state): State<AppState>) -> Envelope<String> {
    Envelope::Items(state.engine.list_tables().to_vec())
}

pub async fn list(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Envelope<Record>, AppError> {
    require_table(&state.engine, &table)?;
    let limit = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_LIMIT);
    let offset = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let rows = state.engine.list_records(&table, offset, limit).await?;
    Ok(Envelope::Items(rows))
}

pub async fn read(
    State(state): State<AppState>,
    Path((table, id_str)): Path<(String, String)>,
) -> Result<Envelope<Record>, AppError> {
    require_table(&state.engine, &table)?;
    let id = parse_id(&state.engine, &table, &id_str)?;
    let row = state.engine.get_record(&table, &id).await?;
    Ok(Envelope::Item(row))
}

pub async fn create(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Result<Envelope<Created>, AppError> {
    require_table(&state.engine, &table)?;
    let payload = decode_payload(body)?;
    let id = state.engine.create_record(&table, &payload).await?;
    Ok(Envelope::Created(Created { id }))
}

pub async fn update(
    State(state): State<AppState>,
    Path((table, id_str)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<Envelope<Updated>, AppError> {
    require_table(&state.engine, &table)?;
    let id = parse_id(&state.engine, &table, &id_str)?;
    let payload = decode_payload(body)?;
    let updated = state.engine.update_record(&table, &id, &payload).await?;
    Ok(Envelope::Item(Updated { updated }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((table, id_str)): Path<(String, String)>,
) -> Result<Envelope<Deleted>, AppError> {
    require_table(&state.engine, &table)?;
    let id = parse_id(&state.engine, &table, &id_str)?;
    let deleted = state.engine.delete_record(&table, &id).await?;
    Ok(Envelope::Item(Deleted { deleted }))
}
