//! Agent directory routes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use database::validation::validate_new_agent;
use database::{agent, Agent, NewAgent};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AdminError, Result};
use crate::state::AppState;

/// Query parameters for listing agents.
#[derive(Debug, Default, Deserialize)]
pub struct AgentQuery {
    pub active: Option<bool>,
}

/// Request to activate or deactivate an agent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUpdate {
    pub is_active: bool,
}

/// Number of agents eligible for new assignments.
#[derive(Serialize)]
pub struct ActiveCount {
    pub count: i64,
}

/// List agents, newest first.
pub async fn list_api(
    State(state): State<AppState>,
    Query(query): Query<AgentQuery>,
) -> Result<Json<Vec<Agent>>> {
    let agents = agent::list_agents(state.db.pool(), query.active).await?;
    Ok(Json(agents))
}

/// Register a new agent.
pub async fn create_api(
    State(state): State<AppState>,
    Json(new_agent): Json<NewAgent>,
) -> Result<(StatusCode, Json<Agent>)> {
    validate_new_agent(&new_agent).map_err(AdminError::InvalidAgent)?;

    let created = agent::create_agent(state.db.pool(), &new_agent).await?;
    info!(agent_id = created.id, email = %created.email, "Created agent");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch one agent.
pub async fn get_api(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Agent>> {
    let found = agent::get_agent(state.db.pool(), id).await?;
    Ok(Json(found))
}

/// Activate or deactivate an agent. Existing assignments are kept.
pub async fn set_active_api(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<ActiveUpdate>,
) -> Result<Json<Agent>> {
    let updated = agent::set_agent_active(state.db.pool(), id, update.is_active).await?;
    info!(agent_id = id, is_active = update.is_active, "Updated agent");
    Ok(Json(updated))
}

/// Count active agents.
pub async fn active_count_api(State(state): State<AppState>) -> Result<Json<ActiveCount>> {
    let (_, active) = agent::count_agents(state.db.pool()).await?;
    Ok(Json(ActiveCount { count: active }))
}
