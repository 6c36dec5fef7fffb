//! Schema catalog: loaded once at startup, read-only afterwards.

mod loader;
mod types;

pub use loader::load_catalog;
pub use types::{Catalog, Field, FieldType, Table};
