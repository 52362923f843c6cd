//! Storage Module
//!
//! Persistence for the diary document and for uploaded audio.
//!
//! # Architecture
//!
//! - **`DocumentStore`** - one trait over every place the `Store` document can
//!   live. `try_load` reports read failures; `load` turns them into the default
//!   empty store for display reads. A missing document is never an error. A
//!   failed write is reported as `false`.
//! - **`StoreRepository`** - the only way handlers touch the document. It runs
//!   every read-modify-write under one async mutex, builds writes only on a
//!   successful `try_load`, and publishes the written snapshot to real-time
//!   subscribers.
//! - **`BlobStore`** - where audio binaries go (local directory or remote
//!   object store).
//!
//! # Module Structure
//!
//! ```text
//! storage/
//! ├── mod.rs           - DocumentStore trait, StorageError, factory
//! ├── local_file.rs    - single JSON file on disk
//! ├── object_store.rs  - single JSON object over HTTP
//! ├── kv_store.rs      - three keys in a REST key-value service
//! ├── memory.rs        - in-process document
//! ├── repository.rs    - serialized read-modify-write
//! └── blobs.rs         - audio binary stores
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::shared::config::StoreBackend;
use crate::shared::{AdminCredentials, Analytics, Entry, Store};

pub mod blobs;
pub mod kv_store;
pub mod local_file;
pub mod memory;
pub mod object_store;
pub mod repository;

pub use blobs::{
    open_blob_store, BlobStore, LocalBlobStore, RemoteBlobStore, StoredBlob, UploadPolicy,
};
pub use kv_store::KvStore;
pub use local_file::LocalFileStore;
pub use memory::MemoryStore;
pub use object_store::ObjectStore;
pub use repository::StoreRepository;

/// Timeout applied to every request against a remote backend
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised inside storage adapters
///
/// Display reads log these and degrade; the repository and the blob stores
/// let them reach the HTTP layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("failed to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("document write did not take effect")]
    WriteFailed,
}

impl From<reqwest::Error> for StorageError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// A place the whole diary document can be read from and written to
///
/// A missing document reads as the default empty store. Any other read
/// failure is an error from `try_load` and the default from `load`, so a
/// write must never be built on `load`. The `replace_*` helpers each do a
/// full read, swap one field and save; adapters that can write a single field
/// directly override them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Read the document; a missing document is the default empty store
    async fn try_load(&self) -> Result<Store, StorageError>;

    /// Write the whole document; false when the write failed
    async fn save(&self, store: &Store) -> bool;

    /// Read the document, or the default empty store when it cannot be read
    async fn load(&self) -> Store {
        match self.try_load().await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("Error reading {} document: {}", self.name(), e);
                Store::default()
            }
        }
    }

    async fn replace_entries(&self, entries: Vec<Entry>) -> bool {
        let Some(mut store) = self.load_for_write().await else {
            return false;
        };
        store.entries = entries;
        self.save(&store).await
    }

    async fn replace_analytics(&self, analytics: Analytics) -> bool {
        let Some(mut store) = self.load_for_write().await else {
            return false;
        };
        store.analytics = analytics;
        self.save(&store).await
    }

    async fn replace_admin_credentials(&self, admin: AdminCredentials) -> bool {
        let Some(mut store) = self.load_for_write().await else {
            return false;
        };
        store.admin = Some(admin);
        self.save(&store).await
    }

    /// `try_load` for the `replace_*` helpers; `None` after a logged failure
    async fn load_for_write(&self) -> Option<Store> {
        match self.try_load().await {
            Ok(store) => Some(store),
            Err(e) => {
                tracing::error!("Not writing {} document after failed read: {}", self.name(), e);
                None
            }
        }
    }
}

/// HTTP client shared by the remote adapters
pub(crate) fn http_client() -> Result<reqwest::Client, StorageError> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(StorageError::from)
}

/// Open the document store selected by configuration
///
/// The local file backend creates its directory and an empty document when
/// they are missing.
pub async fn open_document_store(
    backend: &StoreBackend,
) -> Result<Arc<dyn DocumentStore>, StorageError> {
    let store: Arc<dyn DocumentStore> = match backend {
        StoreBackend::File { path } => {
            let store = LocalFileStore::new(path.clone());
            store.ensure_initialized().await?;
            Arc::new(store)
        }
        StoreBackend::Object {
            base_url,
            token,
            document_key,
        } => Arc::new(ObjectStore::new(
            http_client()?,
            base_url,
            token.clone(),
            document_key,
        )),
        StoreBackend::Kv { base_url, token } => {
            Arc::new(KvStore::new(http_client()?, base_url, token))
        }
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    tracing::info!("Document store ready: {}", store.name());
    Ok(store)
}
