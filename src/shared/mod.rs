//! Shared Module
//!
//! Types shared by every part of the diary: the persisted document model,
//! real-time events, id generation, configuration and the errors they can
//! raise. Nothing in here performs I/O, so the module compiles without the
//! `server` feature.

/// Persisted document model
pub mod entry;

/// Timestamp and id helpers
pub mod ids;

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use entry::{AdminCredentials, Analytics, AnalyticsSummary, Comment, Entry, Store, TopEntry};
pub use event::RealtimeEvent;
pub use error::SharedError;
pub use config::{
    AdminAuthMode, AppConfig, AppConfigBuilder, BlobBackend, ConfigError, StoreBackend,
    UploadLimits,
};
