//! Record store seams.
//!
//! The pipeline never talks to a database directly. It asks an
//! [`AgentDirectory`] who can receive work and hands the result to a
//! [`BatchRecorder`]. Both traits are object-safe and can be used behind
//! `Arc<dyn ...>`.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    ActiveAgent, AgentOrder, AssignedItem, BatchId, BatchInfo, ItemFilter, ItemId, ListItem,
    ListStatus, NewListItem, Page,
};

/// Errors reported by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (pool exhausted, closed, ...).
    #[error("record store unavailable: {0}")]
    Unavailable(String),

    /// A query or write failed.
    #[error("record store query failed: {0}")]
    Query(String),

    /// A stored value could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Source of the agents eligible for new assignments.
#[async_trait]
pub trait AgentDirectory: Send + Sync {
    /// All active agents, in the requested order.
    async fn active_agents(&self, order: AgentOrder) -> Result<Vec<ActiveAgent>, StoreError>;
}

/// Persistence for distributed list items.
#[async_trait]
pub trait BatchRecorder: Send + Sync {
    /// Write all items at once, returning them with generated ids.
    ///
    /// Either every item is written or none is.
    async fn insert_items(&self, items: Vec<NewListItem>) -> Result<Vec<ListItem>, StoreError>;

    /// Items of one batch joined with their agents, in insertion order.
    ///
    /// Items whose agent no longer exists are left out.
    async fn batch_items(&self, batch: BatchId) -> Result<Vec<AssignedItem>, StoreError>;

    /// Every distinct batch, most recent upload first.
    async fn list_batches(&self) -> Result<Vec<BatchInfo>, StoreError>;

    /// Delete all items of a batch, returning how many were removed.
    async fn delete_batch(&self, batch: BatchId) -> Result<u64, StoreError>;

    /// One page of items matching the filter, newest first, plus the total
    /// number of matches.
    async fn list_items(
        &self,
        filter: &ItemFilter,
        page: Page,
    ) -> Result<(Vec<AssignedItem>, i64), StoreError>;

    /// Change an item's status. `None` when the item does not exist.
    async fn update_status(
        &self,
        id: ItemId,
        status: ListStatus,
    ) -> Result<Option<ListItem>, StoreError>;

    /// Delete one item. `false` when the item does not exist.
    async fn delete_item(&self, id: ItemId) -> Result<bool, StoreError>;
}
