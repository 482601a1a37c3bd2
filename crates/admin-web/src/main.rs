//! Admin web interface for contact list distribution.
//!
//! Serves a dashboard plus the JSON API for uploading contact spreadsheets,
//! browsing batches and managing agents.

mod config;
mod error;
mod identity;
mod routes;
mod state;

use database::Database;
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting admin web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Uploads are staged here until parsed
    let upload = &config.distributor.upload;
    tokio::fs::create_dir_all(&upload.temp_directory).await?;
    info!(
        temp_dir = %upload.temp_directory.display(),
        max_bytes = upload.max_file_size_bytes,
        extensions = ?upload.allowed_extensions,
        agent_order = config.distributor.agent_order.as_str(),
        "Upload settings"
    );

    // Build application state
    let max_upload_bytes = upload.max_file_size_bytes;
    let state = AppState::new(db, config.distributor);

    // Build router
    let app = routes::router(max_upload_bytes)
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Admin web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
