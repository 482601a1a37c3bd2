//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: String,
    pub database: String,
}

/// Health check endpoint. Reports a degraded database instead of failing.
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = match ping_database(&state).await {
        Ok(()) => "ok".to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "Database health check failed");
            "unavailable".to_string()
        }
    };

    Json(Health {
        status: "ok".to_string(),
        database,
    })
}

async fn ping_database(state: &AppState) -> database::Result<()> {
    database::agent::count_agents(state.db.pool()).await.map(|_| ())
}
