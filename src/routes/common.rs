//! Operational routes: liveness, readiness (database round trip) and build info.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct Probe {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
}

async fn health() -> Json<Probe> {
    Json(Probe {
        status: "ok",
        database: None,
    })
}

/// 503 with `degraded` while the database is unreachable.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Probe>) {
    match state.engine.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Probe {
                status: "ok",
                database: Some("ok"),
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Probe {
                    status: "degraded",
                    database: Some("unavailable"),
                }),
            )
        }
    }
}

async fn version() -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
