//! Error types for the admin web interface.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use database::{DatabaseError, ValidationError};
use distributor::DistributorError;
use thiserror::Error;

/// Errors that can occur in the admin web interface.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Upload pipeline or batch query error.
    #[error("{0}")]
    Distributor(#[from] DistributorError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Agent fields failed validation.
    #[error("Invalid agent")]
    InvalidAgent(Vec<ValidationError>),

    /// The multipart body could not be read.
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    /// The request is missing something or carries a bad value.
    #[error("{0}")]
    BadRequest(String),

    /// No uploader identity on the request.
    #[error("Unauthorized")]
    Unauthorized,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    fn status(&self) -> StatusCode {
        match self {
            AdminError::Distributor(err) => match err {
                DistributorError::UnsupportedFormat(_)
                | DistributorError::FileTooLarge { .. }
                | DistributorError::EmptyOrMalformedFile(_)
                | DistributorError::ValidationFailed(_)
                | DistributorError::NoActiveAgents => StatusCode::BAD_REQUEST,
                DistributorError::BatchNotFound(_) | DistributorError::ItemNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                DistributorError::Staging(_) | DistributorError::Persistence(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AdminError::Database(err) => match err {
                DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseError::AlreadyExists { .. } => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AdminError::InvalidAgent(_) | AdminError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AdminError::Multipart(err) => err.status(),
            AdminError::Unauthorized => StatusCode::UNAUTHORIZED,
            AdminError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AdminError::Distributor(err) => err.kind(),
            AdminError::Database(DatabaseError::NotFound { .. }) => "not_found",
            AdminError::Database(DatabaseError::AlreadyExists { .. }) => "already_exists",
            AdminError::Database(_) => "database_error",
            AdminError::InvalidAgent(_) => "invalid_agent",
            AdminError::Multipart(_) | AdminError::BadRequest(_) => "bad_request",
            AdminError::Unauthorized => "unauthorized",
            AdminError::Internal(_) => "internal_error",
        }
    }

    fn details(&self) -> Vec<String> {
        match self {
            AdminError::Distributor(err) => err.issue_messages(),
            AdminError::InvalidAgent(errors) => errors.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", message);
        } else {
            tracing::warn!(kind = self.kind(), status = status.as_u16(), "{}", message);
        }

        let mut body = serde_json::json!({
            "error": message,
            "kind": self.kind(),
        });

        let details = self.details();
        if !details.is_empty() {
            body["errors"] = serde_json::json!(details);
        }

        (status, Json(body)).into_response()
    }
}

/// Result type for admin operations.
pub type Result<T> = std::result::Result<T, AdminError>;
