//! Error types for the ingestion service

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use canvaslab_core::EventError;
use canvaslab_storage::StorageError;
use thiserror::Error;
use tracing::{debug, error};

/// Why an ingest request was not accepted
#[derive(Debug, Error)]
pub enum IngestError {
    /// Request used a verb other than POST
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(axum::http::Method),

    /// Body did not decode or failed validation
    #[error("Bad request: {0}")]
    BadRequest(#[from] EventError),

    /// The store rejected the write; nothing was persisted
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Accepted event could not be encoded for storage
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IngestError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            IngestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            IngestError::Storage(_) | IngestError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = status.canonical_reason().unwrap_or("Error");

        match &self {
            IngestError::MethodNotAllowed(_) => {
                debug!(error = %self, "Rejected request");
                return (status, [(header::ALLOW, "POST")], reason).into_response();
            }
            IngestError::BadRequest(_) => debug!(error = %self, "Rejected request"),
            IngestError::Storage(_) | IngestError::Internal(_) => {
                error!(error = %self, "Failed to store event")
            }
        }

        (status, reason).into_response()
    }
}
