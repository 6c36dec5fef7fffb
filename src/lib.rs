//! schema-rest: generic REST CRUD over any PostgreSQL schema, derived from live introspection.

pub mod catalog;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod value;

#[cfg(test)]
mod testing;

pub use catalog::{load_catalog, Catalog, Field, FieldType, Table};
pub use error::{AppError, CatalogError, ConfigError, ValidationError};
pub use routes::{app, common_routes, table_routes, App};
pub use service::{CrudEngine, RawCell, RawRow, RequestValidator, SqlExecutor};
pub use settings::Settings;
pub use state::AppState;
pub use value::{coerce, decode_payload, FieldValue, Payload, Record};
