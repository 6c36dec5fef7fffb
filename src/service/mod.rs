//! CrudEngine: generic CRUD using the safe SQL builder.

mod crud;
mod executor;
mod validation;
pub use crud::CrudEngine;
pub use executor::{RawCell, RawRow, SqlExecutor};
pub use validation::RequestValidator;
