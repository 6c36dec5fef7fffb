//! Table CRUD routes. One parameterized set serves every catalog table; handlers resolve the table by path.

use crate::handlers::{create, delete as delete_handler, list, list_tables, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn table_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_tables))
        .route("/:table", get(list).put(create))
        .route("/:table/:id", get(read).post(update).delete(delete_handler))
        .with_state(state)
}
