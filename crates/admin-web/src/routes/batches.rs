//! Batch routes.

use axum::extract::{Path, State};
use axum::Json;
use distributor::{BatchDistribution, BatchId, BatchInfo, DistributorError};
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Result of deleting a batch.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleted {
    pub deleted_count: u64,
    pub message: String,
}

/// An unparseable id cannot name a stored batch.
fn parse_batch(value: &str) -> Result<BatchId> {
    value
        .parse()
        .map_err(|_| DistributorError::BatchNotFound(value.to_string()).into())
}

/// List every batch, most recent first.
pub async fn batches_api(State(state): State<AppState>) -> Result<Json<Vec<BatchInfo>>> {
    let batches = state.distributor.batches().await?;
    Ok(Json(batches))
}

/// Rebuild one batch's distribution from storage.
pub async fn distribution_api(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> Result<Json<BatchDistribution>> {
    let batch = parse_batch(&batch_id)?;
    let distribution = state.distributor.distribution(batch).await?;
    Ok(Json(distribution))
}

/// Delete every item of a batch.
pub async fn delete_api(
    State(state): State<AppState>,
    Path(batch_id): Path<String>,
) -> Result<Json<BatchDeleted>> {
    let batch = parse_batch(&batch_id)?;
    let deleted_count = state.distributor.delete_batch(batch).await?;
    Ok(Json(BatchDeleted {
        deleted_count,
        message: format!(
            "Batch deleted successfully. {} items removed.",
            deleted_count
        ),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::routes::test_support::*;

    async fn upload(app: &TestApp, csv: &[u8]) -> String {
        let response = app
            .send(upload_request(
                Some("admin@example.com"),
                multipart_body("file", "contacts.csv", csv),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        json_body(response).await["uploadBatch"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_distribution_omits_idle_agents() {
        let app = TestApp::new().await;
        app.add_agent("Zed", "zed@example.com").await;
        app.add_agent("Amy", "amy@example.com").await;
        app.add_agent("Kim", "kim@example.com").await;

        let batch = upload(&app, b"FirstName,Phone,Notes\nAnn,1,\nBen,2,\n").await;

        let response = app
            .send(empty_request("GET", &format!("/api/upload/distribution/{batch}")))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["totalItems"], 2);
        assert_eq!(body["agentsCount"], 2);
        // Sorted by agent name; Kim received nothing.
        assert_eq!(body["distribution"][0]["agentName"], "Amy");
        assert_eq!(body["distribution"][1]["agentName"], "Zed");
        assert_eq!(body["distribution"][0]["items"][0]["firstName"], "Ben");
    }

    #[tokio::test]
    async fn test_batches_listing() {
        let app = TestApp::new().await;
        app.add_agent("Asha", "asha@example.com").await;

        let batch = upload(&app, b"FirstName,Phone,Notes\nAnn,1,\nBen,2,\n").await;

        let body = json_body(app.send(empty_request("GET", "/api/upload/batches")).await).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["uploadBatch"], batch.as_str());
        assert_eq!(body[0]["totalItems"], 2);
        assert_eq!(body[0]["uploadedBy"], "admin@example.com");
    }

    #[tokio::test]
    async fn test_delete_batch_twice() {
        let app = TestApp::new().await;
        app.add_agent("Asha", "asha@example.com").await;

        let batch = upload(&app, b"FirstName,Phone,Notes\nAnn,1,\nBen,2,\n").await;
        let uri = format!("/api/upload/batch/{batch}");

        let response = app.send(empty_request("DELETE", &uri)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["deletedCount"], 2);

        let response = app.send(empty_request("DELETE", &uri)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["kind"], "batch_not_found");

        let response = app
            .send(empty_request("GET", &format!("/api/upload/distribution/{batch}")))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_batch_id_is_not_found() {
        let app = TestApp::new().await;

        let response = app
            .send(empty_request("GET", "/api/upload/distribution/not-a-batch"))
            .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
