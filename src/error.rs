//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Schema introspection failed. Fatal: the server must not start with a partial catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("introspection query failed: {0}")]
    Introspection(#[from] sqlx::Error),
    #[error("introspection row for table '{table}' is missing column '{column}'")]
    MalformedRow { table: String, column: &'static str },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Caller error in a create/update payload. Messages only ever name the offending field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("need required field {0}")]
    FieldRequired(String),
    #[error("field {0} has invalid type")]
    InvalidType(String),
    #[error("undefined field: {0}")]
    UnknownField(String),
    #[error("no fields to update")]
    NoFields,
    #[error("body must be a JSON object")]
    NotAnObject,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("unknown table: {0}")]
    TableNotFound(String),
    #[error("record not found")]
    RecordNotFound,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::TableNotFound(_) | AppError::RecordNotFound => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "server_error"),
        };
        let message = match &self {
            AppError::Db(e) => {
                tracing::error!(error = %e, "database error");
                "server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
