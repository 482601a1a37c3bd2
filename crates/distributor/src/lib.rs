//! Contact list ingestion and distribution.
//!
//! This crate turns an uploaded spreadsheet of contacts into a batch of list
//! items split evenly across the active agents. It defines:
//!
//! - [`TabularParser`] - Reads CSV and Excel uploads into loosely typed rows
//! - [`validation`] - Checks required columns and fields, reporting every problem
//! - [`engine`] - The deterministic remainder-aware split across agents
//! - [`AgentDirectory`] / [`BatchRecorder`] - The record store seams
//! - [`Distributor`] - The upload pipeline and batch queries built on top
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use distributor::{Distributor, DistributorConfig, MemoryStore, UploadedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), distributor::DistributorError> {
//!     let store = Arc::new(MemoryStore::new());
//!     store.add_agent("Ada", "ada@example.com", true).await;
//!     store.add_agent("Grace", "grace@example.com", true).await;
//!
//!     let config = DistributorConfig::default();
//!     let distributor = Distributor::new(store.clone(), store, config.clone());
//!
//!     let csv = b"FirstName,Phone,Notes\nAlice,5550001,\nBob,5550002,call after 5\nCarol,5550003,\n";
//!     let upload = UploadedFile::store(&config.upload.temp_directory, "contacts.csv", csv)?;
//!
//!     let summary = distributor.upload(upload, "admin@example.com").await?;
//!     assert_eq!(summary.total_items, 3);
//!     assert_eq!(summary.distribution[0].item_count, 2);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod summary;
pub mod tabular;
pub mod validation;

pub use config::{DistributorConfig, UploadConfig};
pub use error::{DistributorError, Result};
pub use memory::MemoryStore;
pub use model::{
    ActiveAgent, AgentId, AgentOrder, AssignedItem, BatchId, BatchInfo, Contact, ItemFilter,
    ItemId, ItemPage, ListItem, ListStatus, NewListItem, Page, UnknownStatus,
};
pub use pipeline::Distributor;
pub use store::{AgentDirectory, BatchRecorder, StoreError};
pub use summary::{AgentCount, AgentDistribution, BatchDistribution, UploadSummary};
pub use tabular::{CellValue, FileFormat, Row, TabularParser, UploadedFile};
pub use validation::ValidationIssue;

// Re-export async_trait for store implementations
pub use async_trait::async_trait;
