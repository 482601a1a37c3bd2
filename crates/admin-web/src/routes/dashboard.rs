//! Dashboard routes.

use askama::Template;
use axum::extract::State;
use axum::Json;
use distributor::BatchInfo;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Dashboard page template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub stats: Stats,
}

/// Dashboard statistics.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub agent_count: i64,
    pub active_agent_count: i64,
    pub batch_count: i64,
    pub item_count: i64,
    pub batches: Vec<BatchInfo>,
}

/// Render the dashboard page.
pub async fn dashboard_page(State(state): State<AppState>) -> Result<DashboardTemplate> {
    let stats = get_stats(&state).await?;
    Ok(DashboardTemplate { stats })
}

/// Get dashboard statistics as JSON.
pub async fn stats_api(State(state): State<AppState>) -> Result<Json<Stats>> {
    let stats = get_stats(&state).await?;
    Ok(Json(stats))
}

/// Fetch statistics from the database.
async fn get_stats(state: &AppState) -> Result<Stats> {
    let pool = state.db.pool();

    let (agent_count, active_agent_count) = database::agent::count_agents(pool).await?;
    let (batch_count, item_count) = database::batch::count_batches(pool).await?;
    let batches = state.distributor.batches().await?;

    Ok(Stats {
        agent_count,
        active_agent_count,
        batch_count,
        item_count,
        batches,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::*;

    #[tokio::test]
    async fn test_stats_and_page() {
        let app = TestApp::new().await;
        app.add_agent("Asha", "asha@example.com").await;
        app.send(upload_request(
            Some("admin"),
            multipart_body("file", "contacts.csv", b"FirstName,Phone,Notes\nAnn,1,\n"),
        ))
        .await;

        let body = json_body(app.send(empty_request("GET", "/api/stats")).await).await;
        assert_eq!(body["agentCount"], 1);
        assert_eq!(body["activeAgentCount"], 1);
        assert_eq!(body["batchCount"], 1);
        assert_eq!(body["itemCount"], 1);

        let response = app.send(empty_request("GET", "/")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let app = TestApp::new().await;
        let body = json_body(app.send(empty_request("GET", "/health")).await).await;
        assert_eq!(body["status"], "ok");
    }
}
