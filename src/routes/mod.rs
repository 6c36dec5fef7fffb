//! Router assembly: common routes plus table CRUD, with body limit and request tracing.
//! Trailing slashes are trimmed before routing, so `/users/` and `/users/1/` match.

mod common;
mod tables;

pub use common::common_routes;
pub use tables::table_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

/// The served application. Path normalization has to wrap the router: a layer added
/// with `Router::layer` runs after the route is already matched.
pub type App = NormalizePath<Router>;

pub fn app(state: AppState, body_limit: usize) -> App {
    let router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(table_routes(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http());
    NormalizePath::trim_trailing_slash(router)
}
