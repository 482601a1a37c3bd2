//! The upload pipeline and batch queries.
//!
//! An upload runs as a strict sequence: parse, validate, fetch active
//! agents, distribute, persist, summarize. Each step finishes before the
//! next one starts, and the first failure ends the upload without writing
//! anything. The staged file is removed as soon as parsing finishes, before
//! the batch is written.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{DistributorConfig, UploadConfig};
use crate::engine;
use crate::error::{DistributorError, Result};
use crate::model::{
    AgentOrder, BatchId, BatchInfo, ItemFilter, ItemId, ItemPage, ListItem, ListStatus,
    NewListItem, Page,
};
use crate::store::{AgentDirectory, BatchRecorder};
use crate::summary::{self, BatchDistribution, UploadSummary};
use crate::tabular::{TabularParser, UploadedFile};
use crate::validation;

/// Ingests uploads and answers batch queries.
#[derive(Clone)]
pub struct Distributor {
    directory: Arc<dyn AgentDirectory>,
    recorder: Arc<dyn BatchRecorder>,
    parser: TabularParser,
    agent_order: AgentOrder,
}

impl Distributor {
    /// Create a distributor over the given stores.
    pub fn new(
        directory: Arc<dyn AgentDirectory>,
        recorder: Arc<dyn BatchRecorder>,
        config: DistributorConfig,
    ) -> Self {
        Self {
            directory,
            recorder,
            parser: TabularParser::new(config.upload),
            agent_order: config.agent_order,
        }
    }

    /// Upload limits, for callers that stage files.
    pub fn upload_config(&self) -> &UploadConfig {
        self.parser.config()
    }

    /// Parse, validate and distribute an upload, then record it as a new batch.
    pub async fn upload(&self, file: UploadedFile, uploaded_by: &str) -> Result<UploadSummary> {
        let file_name = file.original_name().to_string();
        info!(file = %file_name, uploaded_by = %uploaded_by, "Processing upload");

        let parser = self.parser.clone();
        let rows = tokio::task::spawn_blocking(move || parser.parse(file))
            .await
            .map_err(|err| {
                DistributorError::EmptyOrMalformedFile(format!("parser task failed: {}", err))
            })??;

        let contacts = validation::into_contacts(rows).map_err(|err| {
            warn!(file = %file_name, error = %err, issues = err.issue_messages().len(), "Upload rejected");
            err
        })?;

        let agents = self.directory.active_agents(self.agent_order).await?;
        if agents.is_empty() {
            warn!(file = %file_name, "No active agents available");
            return Err(DistributorError::NoActiveAgents);
        }

        let batch = BatchId::new();
        debug!(
            batch = %batch,
            items = contacts.len(),
            agents = agents.len(),
            order = self.agent_order.as_str(),
            "Distributing contacts"
        );

        let items: Vec<NewListItem> = engine::distribute(contacts, &agents)?
            .into_iter()
            .map(|assignment| NewListItem {
                first_name: assignment.item.first_name,
                phone: assignment.item.phone,
                notes: assignment.item.notes,
                assigned_to: assignment.agent_id,
                upload_batch: batch,
                uploaded_by: uploaded_by.to_string(),
                status: ListStatus::Pending,
            })
            .collect();

        let inserted = self.recorder.insert_items(items).await.map_err(|err| {
            error!(batch = %batch, error = %err, "Failed to record batch");
            DistributorError::Persistence(err)
        })?;

        let summary = summary::upload_summary(batch, &agents, &inserted);
        info!(
            batch = %batch,
            total_items = summary.total_items,
            agents = summary.agents_count,
            "Upload distributed"
        );

        Ok(summary)
    }

    /// Rebuild the distribution of a stored batch.
    pub async fn distribution(&self, batch: BatchId) -> Result<BatchDistribution> {
        let items = self.recorder.batch_items(batch).await?;
        summary::batch_distribution(batch, items)
            .ok_or_else(|| DistributorError::BatchNotFound(batch.to_string()))
    }

    /// All batches, most recent first.
    pub async fn batches(&self) -> Result<Vec<BatchInfo>> {
        Ok(self.recorder.list_batches().await?)
    }

    /// Delete every item in a batch, returning how many were removed.
    ///
    /// Deleting a batch that has no items (or was already deleted) is
    /// reported as not found.
    pub async fn delete_batch(&self, batch: BatchId) -> Result<u64> {
        let deleted = self.recorder.delete_batch(batch).await?;
        if deleted == 0 {
            return Err(DistributorError::BatchNotFound(batch.to_string()));
        }

        info!(batch = %batch, deleted, "Batch deleted");
        Ok(deleted)
    }

    /// One page of items matching the filter.
    pub async fn list_items(&self, filter: &ItemFilter, page: Page) -> Result<ItemPage> {
        let (items, total) = self.recorder.list_items(filter, page).await?;
        Ok(ItemPage {
            items,
            total,
            page: page.page,
            pages: page.page_count(total),
        })
    }

    /// Move an item to a new status.
    pub async fn update_status(&self, id: ItemId, status: ListStatus) -> Result<ListItem> {
        let item = self
            .recorder
            .update_status(id, status)
            .await?
            .ok_or(DistributorError::ItemNotFound(id))?;

        debug!(item = id, status = %status, "Item status updated");
        Ok(item)
    }

    /// Delete a single item.
    pub async fn delete_item(&self, id: ItemId) -> Result<()> {
        if !self.recorder.delete_item(id).await? {
            return Err(DistributorError::ItemNotFound(id));
        }
        Ok(())
    }
}
