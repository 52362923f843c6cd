//! Shared Error Types
//!
//! Errors raised by the shared model when user-supplied fields fail
//! validation. They carry no HTTP notion; the backend maps them onto status
//! codes.
//!
//! # Usage
//!
//! ```rust
//! use audiodiary::shared::error::SharedError;
//!
//! let error = SharedError::validation("text", "Comment text cannot be empty");
//! assert!(error.to_string().contains("text"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// A request field failed validation
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
