//! Database error types.

use distributor::StoreError;
use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A stored value does not decode into its domain type
    #[error("invalid {entity} value: {value}")]
    InvalidValue { entity: &'static str, value: String },
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Sqlx(sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed) => {
                StoreError::Unavailable(err.to_string())
            }
            DatabaseError::InvalidValue { .. } => StoreError::Corrupt(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;
