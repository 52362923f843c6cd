//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - `AdminGuard` extractor protecting admin-only routes
//!
//! # Example
//!
//! ```rust,no_run
//! use audiodiary::backend::middleware::AdminGuard;
//!
//! async fn admin_only(_guard: AdminGuard) -> &'static str {
//!     "only reached with valid admin credentials"
//! }
//! ```

pub mod auth;

pub use auth::{presented_credentials, AdminGuard};
