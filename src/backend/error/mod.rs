//! Backend Error Module
//!
//! Error types returned by services and HTTP handlers.
//!
//! - **`types`** - `BackendError` and its status code mapping
//! - **`conversion`** - `IntoResponse` implementation (JSON error bodies)

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
