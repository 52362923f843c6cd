/**
 * Local File Store
 *
 * Keeps the whole document in one pretty-printed JSON file. Writes go to a
 * sibling temporary file that is then renamed over the document, so readers
 * never observe a half-written file.
 */

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{DocumentStore, StorageError};
use crate::shared::Store;

#[derive(Debug, Clone)]
pub struct LocalFileStore {
    path: PathBuf,
}

impl LocalFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and an empty document when missing
    pub async fn ensure_initialized(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::info!("Creating empty document at {}", self.path.display());
            self.write(&Store::default()).await?;
        }
        Ok(())
    }

    async fn read(&self) -> Result<Option<Store>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, store: &Store) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(store)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentStore for LocalFileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn try_load(&self) -> Result<Store, StorageError> {
        Ok(self.read().await?.unwrap_or_default())
    }

    async fn save(&self, store: &Store) -> bool {
        match self.write(store).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to write {}: {}", self.path.display(), e);
                false
            }
        }
    }
}
