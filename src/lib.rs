//! Audio Diary - Main Library
//!
//! Backend of a personal audio diary: one admin publishes short audio
//! recordings, anyone can listen, count plays and leave comments.
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no I/O
//!   - The persisted document: entries, comments, analytics, credentials
//!   - Real-time events, id helpers, configuration, shared errors
//!
//! - **`backend`** - Server-side code (only compiled with `server` feature)
//!   - Axum HTTP server and WebSocket push
//!   - Pluggable document stores (local file, object store, key-value, memory)
//!   - Pluggable audio blob stores (local directory, remote object store)
//!   - Admin authentication with bcrypt and JWT session tokens
//!
//! # Feature Flags
//!
//! - **`server`** (default) - enables the backend and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use audiodiary::backend::server::create_app;
//! use audiodiary::shared::{AppConfig, StoreBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder().store(StoreBackend::Memory).build()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for field validation
//! - `shared::ConfigError` for configuration
//! - `backend::storage::StorageError` inside the store adapters
//! - `backend::BackendError` at the HTTP surface

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "server")]
pub mod backend;
