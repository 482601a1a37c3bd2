//! In-memory record store.
//!
//! Implements both store traits over plain vectors. Useful for tests and
//! for exercising the pipeline without a database.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::model::{
    ActiveAgent, AgentId, AgentOrder, AssignedItem, BatchId, BatchInfo, ItemFilter, ItemId,
    ListItem, ListStatus, NewListItem, Page,
};
use crate::store::{AgentDirectory, BatchRecorder, StoreError};

#[derive(Debug, Clone)]
struct StoredAgent {
    agent: ActiveAgent,
    is_active: bool,
}

#[derive(Debug, Default)]
struct Inner {
    agents: Vec<StoredAgent>,
    items: Vec<ListItem>,
    next_agent_id: AgentId,
    next_item_id: ItemId,
    fail_writes: bool,
}

impl Inner {
    fn assigned(&self, item: &ListItem) -> Option<AssignedItem> {
        self.agents
            .iter()
            .find(|stored| stored.agent.id == item.assigned_to)
            .map(|stored| AssignedItem {
                item: item.clone(),
                agent_name: stored.agent.name.clone(),
                agent_email: stored.agent.email.clone(),
            })
    }
}

/// A record store that lives in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an agent, returning its id. Agents keep insertion order as their
    /// creation order.
    pub async fn add_agent(&self, name: &str, email: &str, is_active: bool) -> AgentId {
        let mut inner = self.inner.lock().await;
        inner.next_agent_id += 1;
        let id = inner.next_agent_id;
        inner.agents.push(StoredAgent {
            agent: ActiveAgent {
                id,
                name: name.to_string(),
                email: email.to_string(),
            },
            is_active,
        });
        id
    }

    /// Toggle an agent's active flag. Returns `false` for unknown agents.
    pub async fn set_active(&self, id: AgentId, is_active: bool) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.agents.iter_mut().find(|stored| stored.agent.id == id) {
            Some(stored) => {
                stored.is_active = is_active;
                true
            }
            None => false,
        }
    }

    /// Make every subsequent insert fail, to simulate a storage outage.
    pub async fn fail_writes(&self, fail: bool) {
        self.inner.lock().await.fail_writes = fail;
    }

    /// Snapshot of all stored items, in insertion order.
    pub async fn items(&self) -> Vec<ListItem> {
        self.inner.lock().await.items.clone()
    }
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

#[async_trait]
impl AgentDirectory for MemoryStore {
    async fn active_agents(&self, order: AgentOrder) -> Result<Vec<ActiveAgent>, StoreError> {
        let inner = self.inner.lock().await;
        let mut agents: Vec<ActiveAgent> = inner
            .agents
            .iter()
            .filter(|stored| stored.is_active)
            .map(|stored| stored.agent.clone())
            .collect();

        if order == AgentOrder::Name {
            agents.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }

        Ok(agents)
    }
}

#[async_trait]
impl BatchRecorder for MemoryStore {
    async fn insert_items(&self, items: Vec<NewListItem>) -> Result<Vec<ListItem>, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }

        let created_at = timestamp();
        let mut inserted = Vec::with_capacity(items.len());
        for new in items {
            inner.next_item_id += 1;
            inserted.push(ListItem {
                id: inner.next_item_id,
                first_name: new.first_name,
                phone: new.phone,
                notes: new.notes,
                assigned_to: new.assigned_to,
                upload_batch: new.upload_batch,
                status: new.status,
                uploaded_by: new.uploaded_by,
                created_at: created_at.clone(),
            });
        }

        inner.items.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn batch_items(&self, batch: BatchId) -> Result<Vec<AssignedItem>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .items
            .iter()
            .filter(|item| item.upload_batch == batch)
            .filter_map(|item| inner.assigned(item))
            .collect())
    }

    async fn list_batches(&self) -> Result<Vec<BatchInfo>, StoreError> {
        let inner = self.inner.lock().await;
        let mut batches: Vec<BatchInfo> = Vec::new();

        for item in &inner.items {
            match batches
                .iter_mut()
                .find(|batch| batch.upload_batch == item.upload_batch)
            {
                Some(batch) => {
                    batch.total_items += 1;
                    if item.created_at < batch.upload_date {
                        batch.upload_date = item.created_at.clone();
                    }
                }
                None => batches.push(BatchInfo {
                    upload_batch: item.upload_batch,
                    total_items: 1,
                    upload_date: item.created_at.clone(),
                    uploaded_by: item.uploaded_by.clone(),
                }),
            }
        }

        // Later batches were inserted later; a stable reverse keeps that order
        // for batches that share a timestamp.
        batches.reverse();
        batches.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
        Ok(batches)
    }

    async fn delete_batch(&self, batch: BatchId) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        let before = inner.items.len();
        inner.items.retain(|item| item.upload_batch != batch);
        Ok((before - inner.items.len()) as u64)
    }

    async fn list_items(
        &self,
        filter: &ItemFilter,
        page: Page,
    ) -> Result<(Vec<AssignedItem>, i64), StoreError> {
        let inner = self.inner.lock().await;
        let mut matching: Vec<&ListItem> = inner
            .items
            .iter()
            .filter(|item| filter.matches(item))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .filter_map(|item| inner.assigned(item))
            .collect();

        Ok((items, total))
    }

    async fn update_status(
        &self,
        id: ItemId,
        status: ListStatus,
    ) -> Result<Option<ListItem>, StoreError> {
        let mut inner = self.inner.lock().await;
        Ok(inner.items.iter_mut().find(|item| item.id == id).map(|item| {
            item.status = status;
            item.clone()
        }))
    }

    async fn delete_item(&self, id: ItemId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().await;
        let before = inner.items.len();
        inner.items.retain(|item| item.id != id);
        Ok(inner.items.len() < before)
    }
}
