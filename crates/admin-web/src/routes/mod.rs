//! Route handlers for the admin web interface.

pub mod agents;
pub mod batches;
pub mod dashboard;
pub mod health;
pub mod lists;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the router with all routes.
pub fn router(max_upload_bytes: u64) -> Router<AppState> {
    let body_limit = usize::try_from(max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        // HTML pages
        .route("/", get(dashboard::dashboard_page))
        // Health check
        .route("/health", get(health::health))
        // API endpoints
        .route("/api/stats", get(dashboard::stats_api))
        .route(
            "/api/upload",
            post(upload::upload_api).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/upload/lists", get(lists::list_api))
        .route(
            "/api/upload/lists/:id",
            patch(lists::update_status_api).delete(lists::delete_api),
        )
        .route("/api/upload/batches", get(batches::batches_api))
        .route(
            "/api/upload/distribution/:batch_id",
            get(batches::distribution_api),
        )
        .route(
            "/api/upload/batch/:batch_id",
            axum::routing::delete(batches::delete_api),
        )
        .route("/api/agents", get(agents::list_api).post(agents::create_api))
        .route("/api/agents/active/count", get(agents::active_count_api))
        .route(
            "/api/agents/:id",
            get(agents::get_api).patch(agents::set_active_api),
        )
}
