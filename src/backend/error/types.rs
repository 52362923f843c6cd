/**
 * Backend Error Types
 *
 * This module defines the errors returned by services and HTTP handlers.
 * Every variant maps onto one HTTP status code.
 *
 * # Error Categories
 *
 * ## Request Errors
 *
 * - `BadRequest` - missing or invalid fields (400)
 * - `Unauthorized` - failed admin authentication (401)
 * - `NotFound` - unknown entry or comment, or admin not configured yet (404)
 * - `Conflict` - admin setup attempted twice (409)
 *
 * ## Server Errors
 *
 * - `Internal` - unexpected failures such as hashing errors (500)
 * - `Storage` - a document read or write, or a blob write, that failed (500)
 *
 * Messages of server errors are generic; details go to the log.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;
use crate::backend::storage::StorageError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use audiodiary::backend::error::BackendError;
///
/// let err = BackendError::not_found("Entry not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Storage backend failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Validation failure from the shared model
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message that is safe to send to clients
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.clone(),
            Self::Storage(_) => "Storage operation failed".to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
        }
    }
}
