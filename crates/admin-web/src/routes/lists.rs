//! List item routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use distributor::{BatchId, ItemFilter, ItemId, ItemPage, ListItem, ListStatus, Page};
use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};
use crate::state::AppState;

/// Query parameters for listing items.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub agent_id: Option<i64>,
    pub upload_batch: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    fn filter(&self) -> Result<ItemFilter> {
        let upload_batch = self
            .upload_batch
            .as_deref()
            .map(|value| {
                value
                    .parse::<BatchId>()
                    .map_err(|_| AdminError::BadRequest(format!("Invalid upload batch: {}", value)))
            })
            .transpose()?;

        let status = self
            .status
            .as_deref()
            .map(|value| {
                value
                    .parse::<ListStatus>()
                    .map_err(|err| AdminError::BadRequest(err.to_string()))
            })
            .transpose()?;

        Ok(ItemFilter {
            agent_id: self.agent_id,
            upload_batch,
            status,
        })
    }
}

/// Request to change an item's status.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Confirmation of a deleted item.
#[derive(Serialize)]
pub struct Deleted {
    pub id: ItemId,
    pub message: String,
}

/// List items, newest first, with optional filters.
pub async fn list_api(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ItemPage>> {
    let filter = query.filter()?;
    let page = Page::new(query.page, query.limit);
    let items = state.distributor.list_items(&filter, page).await?;
    Ok(Json(items))
}

/// Change the status of one item.
pub async fn update_status_api(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ListItem>> {
    let status = update
        .status
        .parse::<ListStatus>()
        .map_err(|err| AdminError::BadRequest(err.to_string()))?;

    let item = state.distributor.update_status(id, status).await?;
    Ok(Json(item))
}

/// Remove one item.
pub async fn delete_api(
    State(state): State<AppState>,
    Path(id): Path<ItemId>,
) -> Result<Json<Deleted>> {
    state.distributor.delete_item(id).await?;
    Ok(Json(Deleted {
        id,
        message: "List item deleted".to_string(),
    }))
}
