//! Domain types shared by the pipeline and the record stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an agent in the directory.
pub type AgentId = i64;

/// Identifier of a persisted list item.
pub type ItemId = i64;

/// Identifier shared by every list item created from one upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub Uuid);

impl BatchId {
    /// Mint a fresh batch identifier.
    pub fn new() -> Self {
        BatchId(Uuid::new_v4())
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for BatchId {
    fn from(uuid: Uuid) -> Self {
        BatchId(uuid)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BatchId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(BatchId)
    }
}

/// The slice of an agent the distribution step needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAgent {
    pub id: AgentId,
    pub name: String,
    pub email: String,
}

/// Order in which the directory returns active agents.
///
/// The split is order-sensitive, so the order is always chosen explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentOrder {
    /// Oldest agent first, ties broken by id.
    #[default]
    CreatedAt,
    /// Alphabetical by name, ties broken by id.
    Name,
}

impl AgentOrder {
    /// Configuration name of this order.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentOrder::CreatedAt => "created",
            AgentOrder::Name => "name",
        }
    }
}

impl FromStr for AgentOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "created" | "created_at" | "creation" => Ok(AgentOrder::CreatedAt),
            "name" => Ok(AgentOrder::Name),
            other => Err(format!("unknown agent order: {}", other)),
        }
    }
}

/// A validated contact row, ready to be assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
}

/// Follow-up status of a list item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ListStatus {
    /// Stored and wire form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListStatus::Pending => "pending",
            ListStatus::InProgress => "in-progress",
            ListStatus::Completed => "completed",
            ListStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown list status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for ListStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pending" => Ok(ListStatus::Pending),
            "in-progress" => Ok(ListStatus::InProgress),
            "completed" => Ok(ListStatus::Completed),
            "cancelled" => Ok(ListStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A list item about to be written to the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewListItem {
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub assigned_to: AgentId,
    pub upload_batch: BatchId,
    pub uploaded_by: String,
    pub status: ListStatus,
}

/// A persisted list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: ItemId,
    pub first_name: String,
    pub phone: String,
    pub notes: String,
    pub assigned_to: AgentId,
    pub upload_batch: BatchId,
    pub status: ListStatus,
    pub uploaded_by: String,
    pub created_at: String,
}

/// A list item joined with the agent it is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedItem {
    #[serde(flatten)]
    pub item: ListItem,
    pub agent_name: String,
    pub agent_email: String,
}

/// One upload batch as seen from the stored items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInfo {
    pub upload_batch: BatchId,
    pub total_items: i64,
    /// Earliest creation time among the batch's items.
    pub upload_date: String,
    pub uploaded_by: String,
}

/// Filters for listing items. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub agent_id: Option<AgentId>,
    pub upload_batch: Option<BatchId>,
    pub status: Option<ListStatus>,
}

impl ItemFilter {
    /// Check whether an item passes the filter.
    pub fn matches(&self, item: &ListItem) -> bool {
        self.agent_id.map_or(true, |id| item.assigned_to == id)
            && self.upload_batch.map_or(true, |batch| item.upload_batch == batch)
            && self.status.map_or(true, |status| item.status == status)
    }
}

/// Default number of items per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A 1-based page request, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Build a page from optional user input.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
        }
    }

    /// Number of items to skip.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// Number of pages needed for `total` items.
    pub fn page_count(&self, total: i64) -> i64 {
        let limit = i64::from(self.limit);
        (total.max(0) + limit - 1) / limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of assigned items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPage {
    pub items: Vec<AssignedItem>,
    pub total: i64,
    pub page: u32,
    pub pages: i64,
}
