//! Database models.

use distributor::{AssignedItem, BatchId, BatchInfo, ListItem, ListStatus};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{DatabaseError, Result};

/// An agent in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique, lowercased email address.
    pub email: String,
    /// Dialing prefix (e.g., "+91").
    pub country_code: String,
    /// Mobile number without the prefix.
    pub mobile_number: String,
    /// Whether the agent receives new assignments.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields needed to create an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAgent {
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub mobile_number: String,
}

/// A `list_items` row as stored.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ListItemRow {
    pub id: i64,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub assigned_to: i64,
    pub upload_batch: String,
    pub status: String,
    pub uploaded_by: String,
    pub created_at: String,
}

impl TryFrom<ListItemRow> for ListItem {
    type Error = DatabaseError;

    fn try_from(row: ListItemRow) -> Result<Self> {
        let upload_batch = parse_batch(&row.upload_batch)?;
        let status = row
            .status
            .parse::<ListStatus>()
            .map_err(|_| DatabaseError::InvalidValue {
                entity: "status",
                value: row.status.clone(),
            })?;

        Ok(ListItem {
            id: row.id,
            first_name: row.first_name,
            phone: row.phone,
            notes: row.notes,
            assigned_to: row.assigned_to,
            upload_batch,
            status,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        })
    }
}

/// A list item joined with its agent.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct AssignedItemRow {
    #[sqlx(flatten)]
    pub item: ListItemRow,
    pub agent_name: String,
    pub agent_email: String,
}

impl TryFrom<AssignedItemRow> for AssignedItem {
    type Error = DatabaseError;

    fn try_from(row: AssignedItemRow) -> Result<Self> {
        Ok(AssignedItem {
            item: row.item.try_into()?,
            agent_name: row.agent_name,
            agent_email: row.agent_email,
        })
    }
}

/// One row of the batch listing aggregate.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct BatchInfoRow {
    pub upload_batch: String,
    pub total_items: i64,
    pub upload_date: String,
    pub uploaded_by: String,
}

impl TryFrom<BatchInfoRow> for BatchInfo {
    type Error = DatabaseError;

    fn try_from(row: BatchInfoRow) -> Result<Self> {
        Ok(BatchInfo {
            upload_batch: parse_batch(&row.upload_batch)?,
            total_items: row.total_items,
            upload_date: row.upload_date,
            uploaded_by: row.uploaded_by,
        })
    }
}

fn parse_batch(value: &str) -> Result<BatchId> {
    value.parse().map_err(|_| DatabaseError::InvalidValue {
        entity: "upload batch",
        value: value.to_string(),
    })
}

/// Convert a list of rows, failing on the first undecodable one.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = DatabaseError>,
{
    rows.into_iter().map(T::try_from).collect()
}
