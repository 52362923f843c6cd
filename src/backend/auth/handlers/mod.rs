//! Admin Handlers
//!
//! HTTP handlers for the `/api/admin/*` credential endpoints.

/// Request/response types
pub mod types;

/// Check, setup and reset handlers
pub mod setup;

/// Login and verify handlers
pub mod login;

pub use login::{login, verify};
pub use setup::{check_setup, reset_password, setup};
