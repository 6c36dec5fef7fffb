//! Server: loads settings, introspects the schema once, then serves table CRUD over HTTP.

use axum::{extract::Request, ServiceExt};
use schema_rest::{app, load_catalog, AppState, CrudEngine, Settings};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("schema_rest=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await?;

    // Catalog load failure aborts startup.
    let catalog = load_catalog(&pool, &settings.schema).await?;
    let engine = CrudEngine::new(Arc::new(pool), Arc::new(catalog));
    let router = app(AppState::new(engine), settings.body_limit);

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(router)).await?;
    Ok(())
}
