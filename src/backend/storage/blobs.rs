/**
 * Audio Blob Stores
 *
 * Uploaded audio binaries are kept apart from the diary document. Two stores
 * exist:
 *
 * - [`LocalBlobStore`] writes files under a directory that the router serves
 *   at `/audio`. It enforces a size ceiling and a MIME whitelist.
 * - [`RemoteBlobStore`] PUTs objects into an HTTP object store and hands out
 *   absolute URLs. It enforces neither limit.
 *
 * Stored names are `{millis}-{uuid}` plus the original file extension, so
 * two uploads never collide.
 */

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};

use super::{http_client, StorageError};
use crate::shared::config::{BlobBackend, UploadLimits};

/// URL prefix under which local audio files are served
pub const LOCAL_AUDIO_ROUTE: &str = "/audio";

/// A stored binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub name: String,
    /// URL written into the entry's `audioUrl`
    pub url: String,
}

/// Limits a blob store applies to incoming uploads; `None` means unchecked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadPolicy {
    pub max_bytes: Option<u64>,
    pub allowed_types: Option<Vec<String>>,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    fn name(&self) -> &'static str;

    fn upload_policy(&self) -> UploadPolicy;

    /// Store `data` under a fresh name derived from `original_name`
    async fn put(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<StoredBlob, StorageError>;

    /// Delete the blob behind `audio_url`
    ///
    /// Returns false when the URL does not belong to this store or the blob
    /// was already gone.
    async fn delete(&self, audio_url: &str) -> Result<bool, StorageError>;
}

/// `{millis}-{uuid}` plus the sanitized extension of `original_name`
pub fn generate_blob_name(original_name: Option<&str>) -> String {
    let stem = format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple()
    );
    let extension = original_name
        .and_then(|name| std::path::Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ext.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(8)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|ext| !ext.is_empty());
    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// A stored name is one plain path segment
fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    dir: PathBuf,
    limits: UploadLimits,
}

impl LocalBlobStore {
    pub fn new(dir: impl Into<PathBuf>, limits: UploadLimits) -> Self {
        Self {
            dir: dir.into(),
            limits,
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    pub async fn ensure_dir(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn name(&self) -> &'static str {
        "local"
    }

    fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_bytes: Some(self.limits.max_audio_bytes),
            allowed_types: Some(self.limits.allowed_audio_types.clone()),
        }
    }

    async fn put(
        &self,
        original_name: Option<&str>,
        _content_type: Option<&str>,
        data: Bytes,
    ) -> Result<StoredBlob, StorageError> {
        let name = generate_blob_name(original_name);
        tokio::fs::write(self.dir.join(&name), &data).await?;
        tracing::info!("Stored {} bytes as {}", data.len(), name);
        Ok(StoredBlob {
            url: format!("{}/{}", LOCAL_AUDIO_ROUTE, name),
            name,
        })
    }

    async fn delete(&self, audio_url: &str) -> Result<bool, StorageError> {
        let Some(name) = audio_url
            .strip_prefix(LOCAL_AUDIO_ROUTE)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| is_plain_name(name))
        else {
            return Ok(false);
        };
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteBlobStore {
    client: Client,
    base_url: String,
    token: Option<String>,
    folder: String,
    public_base_url: String,
}

impl RemoteBlobStore {
    pub fn new(
        client: Client,
        base_url: &str,
        token: Option<String>,
        folder: &str,
        public_base_url: Option<&str>,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let public_base_url = public_base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| base_url.clone());
        Self {
            client,
            base_url,
            token,
            folder: folder.trim_matches('/').to_string(),
            public_base_url,
        }
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.folder, name)
    }

    fn public_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, self.folder, name)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl BlobStore for RemoteBlobStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::default()
    }

    async fn put(
        &self,
        original_name: Option<&str>,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<StoredBlob, StorageError> {
        let name = generate_blob_name(original_name);
        let url = self.object_url(&name);
        let response = self
            .authorize(self.client.put(&url))
            .header(
                CONTENT_TYPE,
                content_type.unwrap_or("application/octet-stream"),
            )
            .body(data)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        tracing::info!("Uploaded audio to {}", url);
        Ok(StoredBlob {
            url: self.public_url(&name),
            name,
        })
    }

    async fn delete(&self, audio_url: &str) -> Result<bool, StorageError> {
        let prefix = format!("{}/{}/", self.public_base_url, self.folder);
        let Some(name) = audio_url
            .strip_prefix(&prefix)
            .filter(|name| is_plain_name(name))
        else {
            return Ok(false);
        };
        let url = self.object_url(name);
        let response = self.authorize(self.client.delete(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(true)
    }
}

/// Open the blob store selected by configuration
pub async fn open_blob_store(
    backend: &BlobBackend,
    limits: &UploadLimits,
) -> Result<Arc<dyn BlobStore>, StorageError> {
    let store: Arc<dyn BlobStore> = match backend {
        BlobBackend::Local { dir } => {
            let store = LocalBlobStore::new(dir.clone(), limits.clone());
            store.ensure_dir().await?;
            Arc::new(store)
        }
        BlobBackend::Remote {
            base_url,
            token,
            folder,
            public_base_url,
        } => Arc::new(RemoteBlobStore::new(
            http_client()?,
            base_url,
            token.clone(),
            folder,
            public_base_url.as_deref(),
        )),
    };
    tracing::info!("Blob store ready: {}", store.name());
    Ok(store)
}
