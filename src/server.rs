/// Server setup and initialization
///
/// Wires together the site database, content stores and HTTP routes.
/// Provides the main application factory function for creating the Axum app.

use crate::{
    api::{create_admin_routes, create_public_routes, AppState},
    config::Config,
    content::database::open_database,
};
use anyhow::Result;
use axum::{routing::get, Router};
use sqlx::sqlite::SqlitePool;
use tokio::net::TcpListener;

/// Create the main Axum application with all routes
///
/// Opens (or creates) the site database under the configured data directory.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("📁 Using data directory: {}", config.database.data_dir);
    let pool = open_database(&config.database.database_path())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open site database: {}", e))?;

    Ok(build_router(pool, &config))
}

/// Build the router over an already opened pool
pub fn build_router(pool: SqlitePool, config: &Config) -> Router {
    if config.admin.token.is_none() {
        tracing::warn!("⚠️ FOLIO_ADMIN_TOKEN not set: admin routes are unauthenticated");
    }

    let state = AppState::new(pool, config.admin.token.clone());

    tracing::info!("📡 Creating HTTP router with all endpoints");
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Public read endpoints
        .merge(create_public_routes())
        // Admin endpoints
        .merge(create_admin_routes(state.clone(), config.admin.max_import_bytes))
        .with_state(state)
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Folio server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
