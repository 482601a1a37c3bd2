//! Record store trait implementations for [`Database`].

use async_trait::async_trait;
use distributor::{
    ActiveAgent, AgentDirectory, AgentOrder, AssignedItem, BatchId, BatchInfo,
    BatchRecorder, ItemFilter, ItemId, ListItem, ListStatus, NewListItem, Page, StoreError,
};

use crate::error::DatabaseError;
use crate::{agent, batch, list_item, Database};

#[async_trait]
impl AgentDirectory for Database {
    async fn active_agents(&self, order: AgentOrder) -> Result<Vec<ActiveAgent>, StoreError> {
        Ok(agent::list_active_agents(self.pool(), order).await?)
    }
}

#[async_trait]
impl BatchRecorder for Database {
    async fn insert_items(&self, items: Vec<NewListItem>) -> Result<Vec<ListItem>, StoreError> {
        Ok(list_item::insert_items(self.pool(), &items).await?)
    }

    async fn batch_items(&self, batch: BatchId) -> Result<Vec<AssignedItem>, StoreError> {
        Ok(batch::batch_items(self.pool(), batch).await?)
    }

    async fn list_batches(&self) -> Result<Vec<BatchInfo>, StoreError> {
        Ok(batch::list_batches(self.pool()).await?)
    }

    async fn delete_batch(&self, batch: BatchId) -> Result<u64, StoreError> {
        Ok(batch::delete_batch(self.pool(), batch).await?)
    }

    async fn list_items(
        &self,
        filter: &ItemFilter,
        page: Page,
    ) -> Result<(Vec<AssignedItem>, i64), StoreError> {
        Ok(list_item::list_items(self.pool(), filter, page).await?)
    }

    async fn update_status(
        &self,
        id: ItemId,
        status: ListStatus,
    ) -> Result<Option<ListItem>, StoreError> {
        match list_item::update_status(self.pool(), id, status).await {
            Ok(item) => Ok(Some(item)),
            Err(DatabaseError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_item(&self, id: ItemId) -> Result<bool, StoreError> {
        match list_item::delete_item(self.pool(), id).await {
            Ok(()) => Ok(true),
            Err(DatabaseError::NotFound { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
