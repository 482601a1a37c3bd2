//! Upload batch queries.
//!
//! A batch has no table of its own; it is the `upload_batch` value shared by
//! its list items.

use distributor::{AssignedItem, BatchId, BatchInfo};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::list_item::ITEM_COLUMNS;
use crate::models::{convert_rows, AssignedItemRow, BatchInfoRow};

/// Items of a batch joined with their agents, in insertion order.
pub async fn batch_items(pool: &SqlitePool, batch: BatchId) -> Result<Vec<AssignedItem>> {
    let rows = sqlx::query_as::<_, AssignedItemRow>(&format!(
        r#"
        SELECT {ITEM_COLUMNS}, a.name AS agent_name, a.email AS agent_email
        FROM list_items li
        INNER JOIN agents a ON a.id = li.assigned_to
        WHERE li.upload_batch = ?
        ORDER BY li.id
        "#
    ))
    .bind(batch.to_string())
    .fetch_all(pool)
    .await?;

    convert_rows(rows)
}

/// List every batch with its size, first upload time and uploader,
/// most recent first.
pub async fn list_batches(pool: &SqlitePool) -> Result<Vec<BatchInfo>> {
    let rows = sqlx::query_as::<_, BatchInfoRow>(
        r#"
        SELECT upload_batch,
               COUNT(*) AS total_items,
               MIN(created_at) AS upload_date,
               MIN(uploaded_by) AS uploaded_by
        FROM list_items
        GROUP BY upload_batch
        ORDER BY upload_date DESC, MAX(id) DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    convert_rows(rows)
}

/// Delete every item of a batch, returning how many were removed.
pub async fn delete_batch(pool: &SqlitePool, batch: BatchId) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM list_items
        WHERE upload_batch = ?
        "#,
    )
    .bind(batch.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count distinct batches and stored items as `(batches, items)`.
pub async fn count_batches(pool: &SqlitePool) -> Result<(i64, i64)> {
    let counts = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(DISTINCT upload_batch), COUNT(*)
        FROM list_items
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(counts)
}
