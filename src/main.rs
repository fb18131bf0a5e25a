/// Folio: content backend for a personal portfolio site
///
/// Main entry point. Loads configuration from the environment and starts the
/// HTTP server.

use folio::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Public content API at /api/*
/// - Admin API (sections, blocks, projects, settings, export/import) at /admin/*
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004 and instance/site.db)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
