//! Upload route.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use distributor::{UploadSummary, UploadedFile};
use tracing::info;

use crate::error::{AdminError, Result};
use crate::identity::AdminUser;
use crate::state::AppState;

/// Multipart field that carries the spreadsheet.
const FILE_FIELD: &str = "file";

/// Accept a spreadsheet, distribute its contacts and record the batch.
pub async fn upload_api(
    State(state): State<AppState>,
    AdminUser(uploaded_by): AdminUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadSummary>)> {
    let temp_dir = state.distributor.upload_config().temp_directory.clone();
    let mut staged = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        info!(file = %file_name, bytes = bytes.len(), "Received upload");

        let dir = temp_dir.clone();
        let file = tokio::task::spawn_blocking(move || {
            UploadedFile::store(&dir, &file_name, &bytes)
        })
        .await
        .map_err(|err| AdminError::Internal(format!("staging task failed: {}", err)))??;

        staged = Some(file);
        break;
    }

    let Some(file) = staged else {
        return Err(AdminError::BadRequest("Please upload a file".to_string()));
    };

    let summary = state.distributor.upload(file, &uploaded_by).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}
