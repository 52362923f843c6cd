//! In-process document store, lost on restart

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DocumentStore, StorageError};
use crate::shared::Store;

#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<Store>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document
    pub fn with_store(store: Store) -> Self {
        Self {
            document: RwLock::new(store),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn try_load(&self) -> Result<Store, StorageError> {
        Ok(self.document.read().await.clone())
    }

    async fn save(&self, store: &Store) -> bool {
        *self.document.write().await = store.clone();
        true
    }
}
