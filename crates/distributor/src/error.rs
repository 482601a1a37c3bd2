//! Error types for the upload pipeline.

use thiserror::Error;

use crate::model::ItemId;
use crate::store::StoreError;
use crate::validation::ValidationIssue;

/// Errors that can occur while ingesting or querying batches.
#[derive(Debug, Error)]
pub enum DistributorError {
    /// The file extension is not accepted.
    #[error("Invalid file format: {0}")]
    UnsupportedFormat(String),

    /// The file exceeds the configured size limit.
    #[error("File is too large ({size} bytes, max {max})")]
    FileTooLarge { size: u64, max: u64 },

    /// The parser produced no rows or could not read the file.
    #[error("File is empty or invalid: {0}")]
    EmptyOrMalformedFile(String),

    /// One or more header or row problems. Carries every problem found.
    #[error("Data validation failed")]
    ValidationFailed(Vec<ValidationIssue>),

    /// The agent directory returned nobody to distribute to.
    #[error("No active agents available for distribution")]
    NoActiveAgents,

    /// No stored items carry the batch id.
    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    /// No stored item has the id.
    #[error("List item not found: {0}")]
    ItemNotFound(ItemId),

    /// The upload could not be written to the staging directory.
    #[error("Failed to stage upload: {0}")]
    Staging(#[from] std::io::Error),

    /// The record store failed.
    #[error("Storage error: {0}")]
    Persistence(#[from] StoreError),
}

impl DistributorError {
    /// Whether the caller can fix this by changing the request or the file.
    ///
    /// `NoActiveAgents` counts as a server-side condition: nothing in the
    /// upload can make it succeed.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DistributorError::UnsupportedFormat(_)
                | DistributorError::FileTooLarge { .. }
                | DistributorError::EmptyOrMalformedFile(_)
                | DistributorError::ValidationFailed(_)
        )
    }

    /// Stable machine-readable name of the error.
    pub fn kind(&self) -> &'static str {
        match self {
            DistributorError::UnsupportedFormat(_) => "unsupported_format",
            DistributorError::FileTooLarge { .. } => "file_too_large",
            DistributorError::EmptyOrMalformedFile(_) => "empty_or_malformed_file",
            DistributorError::ValidationFailed(_) => "validation_failed",
            DistributorError::NoActiveAgents => "no_active_agents",
            DistributorError::BatchNotFound(_) => "batch_not_found",
            DistributorError::ItemNotFound(_) => "item_not_found",
            DistributorError::Staging(_) => "staging_failed",
            DistributorError::Persistence(_) => "persistence_failure",
        }
    }

    /// Human-readable messages for every validation issue, if any.
    pub fn issue_messages(&self) -> Vec<String> {
        match self {
            DistributorError::ValidationFailed(issues) => {
                issues.iter().map(ToString::to_string).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, DistributorError>;
