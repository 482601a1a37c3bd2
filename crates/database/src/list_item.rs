//! List item persistence.

use distributor::{AssignedItem, ItemFilter, ListItem, ListStatus, NewListItem, Page};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{convert_rows, AssignedItemRow, ListItemRow};

pub(crate) const ITEM_COLUMNS: &str = "li.id, li.first_name, li.phone, li.notes, li.assigned_to, \
     li.upload_batch, li.status, li.uploaded_by, li.created_at";

/// Insert a batch of items in one transaction, returning the stored rows.
///
/// If any insert fails the transaction is rolled back and nothing is stored.
pub async fn insert_items(pool: &SqlitePool, items: &[NewListItem]) -> Result<Vec<ListItem>> {
    let mut tx = pool.begin().await?;
    let mut inserted = Vec::with_capacity(items.len());

    for item in items {
        let row = sqlx::query_as::<_, ListItemRow>(
            r#"
            INSERT INTO list_items
                (first_name, phone, notes, assigned_to, upload_batch, status, uploaded_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, first_name, phone, notes, assigned_to, upload_batch, status,
                      uploaded_by, created_at
            "#,
        )
        .bind(&item.first_name)
        .bind(&item.phone)
        .bind(&item.notes)
        .bind(item.assigned_to)
        .bind(item.upload_batch.to_string())
        .bind(item.status.as_str())
        .bind(&item.uploaded_by)
        .fetch_one(&mut *tx)
        .await?;

        inserted.push(ListItem::try_from(row)?);
    }

    tx.commit().await?;

    tracing::debug!(count = inserted.len(), "Inserted list items");
    Ok(inserted)
}

/// Get a list item by ID.
pub async fn get_item(pool: &SqlitePool, id: i64) -> Result<ListItem> {
    sqlx::query_as::<_, ListItemRow>(
        r#"
        SELECT id, first_name, phone, notes, assigned_to, upload_batch, status,
               uploaded_by, created_at
        FROM list_items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "List item",
        id: id.to_string(),
    })?
    .try_into()
}

/// Set the status of a list item.
pub async fn update_status(pool: &SqlitePool, id: i64, status: ListStatus) -> Result<ListItem> {
    sqlx::query_as::<_, ListItemRow>(
        r#"
        UPDATE list_items
        SET status = ?
        WHERE id = ?
        RETURNING id, first_name, phone, notes, assigned_to, upload_batch, status,
                  uploaded_by, created_at
        "#,
    )
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "List item",
        id: id.to_string(),
    })?
    .try_into()
}

/// Delete a list item by ID.
pub async fn delete_item(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM list_items
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "List item",
            id: id.to_string(),
        });
    }

    Ok(())
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &ItemFilter) {
    let mut clauses = 0;
    let mut next_clause = |query: &mut QueryBuilder<'_, Sqlite>| {
        query.push(if clauses == 0 { " WHERE " } else { " AND " });
        clauses += 1;
    };

    if let Some(agent_id) = filter.agent_id {
        next_clause(query);
        query.push("li.assigned_to = ").push_bind(agent_id);
    }
    if let Some(batch) = filter.upload_batch {
        next_clause(query);
        query.push("li.upload_batch = ").push_bind(batch.to_string());
    }
    if let Some(status) = filter.status {
        next_clause(query);
        query.push("li.status = ").push_bind(status.as_str());
    }
}

/// List one page of items matching the filter, newest first.
///
/// Returns the page and the total number of matching items.
pub async fn list_items(
    pool: &SqlitePool,
    filter: &ItemFilter,
    page: Page,
) -> Result<(Vec<AssignedItem>, i64)> {
    let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM list_items li");
    push_filters(&mut count, filter);
    let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let mut query = QueryBuilder::<Sqlite>::new(format!(
        "SELECT {ITEM_COLUMNS}, a.name AS agent_name, a.email AS agent_email \
         FROM list_items li INNER JOIN agents a ON a.id = li.assigned_to"
    ));
    push_filters(&mut query, filter);
    query
        .push(" ORDER BY li.created_at DESC, li.id DESC LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(page.offset());

    let rows = query
        .build_query_as::<AssignedItemRow>()
        .fetch_all(pool)
        .await?;

    Ok((convert_rows(rows)?, total))
}
