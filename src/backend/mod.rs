//! Backend Module
//!
//! Server-side code of the audio diary: an Axum HTTP server over a single
//! persisted document.
//!
//! # Overview
//!
//! - Public listening: entries, plays, comments, visits
//! - One admin account: setup, login, password reset by security question
//! - Admin content management: upload, delete, moderation, analytics
//! - Real-time push of the entry list over WebSocket
//!
//! This module is only compiled when the `server` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration loading, application state, startup
//! - **`routes`** - Router assembly, CORS, static files
//! - **`storage`** - Document store backends, blob stores, repository
//! - **`auth`** - Admin credentials and session tokens
//! - **`diary`** - Entries, comments and analytics
//! - **`upload`** - Multipart audio upload
//! - **`realtime`** - Snapshot broadcast and WebSocket endpoint
//! - **`middleware`** - Admin guard extractor
//! - **`error`** - Backend error type and HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── storage/        - Persistence
//! ├── auth/           - Admin account
//! ├── diary/          - Entries, comments, analytics
//! ├── upload/         - Audio upload
//! ├── realtime/       - Push updates
//! ├── middleware/     - Request guards
//! └── error/          - Error types
//! ```
//!
//! # Consistency
//!
//! Every mutation is a read-modify-write of the whole document. Within one
//! process the `StoreRepository` serializes writers behind a mutex; readers
//! take no lock and see the last saved document.
//!
//! # Example
//!
//! ```rust,no_run
//! use audiodiary::backend::server::{create_app, load_config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config()?;
//! let port = config.port;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Document and blob persistence
pub mod storage;

/// Admin account and sessions
pub mod auth;

/// Entries, comments and analytics
pub mod diary;

/// Multipart audio upload
pub mod upload;

/// Real-time update system
pub mod realtime;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use realtime::{broadcast_event, RealtimeEventBroadcast};
pub use server::create_app;
pub use storage::{DocumentStore, StoreRepository};
