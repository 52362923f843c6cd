/**
 * Object Store Adapter
 *
 * Keeps the document as one JSON object in a remote HTTP object store.
 *
 * - read: `GET {base}/{key}?t={millis}` (the query defeats CDN caches),
 *   404 means no document yet
 * - write: `PUT {base}/{key}` with the serialized document
 *
 * An optional bearer token is sent with both. Any other failed read is an
 * error, never an empty document.
 */

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};

use super::{DocumentStore, StorageError};
use crate::shared::Store;

#[derive(Debug, Clone)]
pub struct ObjectStore {
    client: Client,
    base_url: String,
    token: Option<String>,
    document_key: String,
}

impl ObjectStore {
    pub fn new(
        client: Client,
        base_url: &str,
        token: Option<String>,
        document_key: &str,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            document_key: document_key.trim_start_matches('/').to_string(),
        }
    }

    fn document_url(&self) -> String {
        format!("{}/{}", self.base_url, self.document_key)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch(&self) -> Result<Option<Store>, StorageError> {
        let url = format!(
            "{}?t={}",
            self.document_url(),
            chrono::Utc::now().timestamp_millis()
        );
        let response = self.authorize(self.client.get(&url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                url: self.document_url(),
            });
        }
        let bytes = response.bytes().await?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn upload(&self, store: &Store) -> Result<(), StorageError> {
        let body = serde_json::to_vec(store)?;
        let response = self
            .authorize(self.client.put(self.document_url()))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                url: self.document_url(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for ObjectStore {
    fn name(&self) -> &'static str {
        "object"
    }

    async fn try_load(&self) -> Result<Store, StorageError> {
        match self.fetch().await? {
            Some(store) => Ok(store),
            None => {
                tracing::info!("No document at {}, starting empty", self.document_url());
                Ok(Store::default())
            }
        }
    }

    async fn save(&self, store: &Store) -> bool {
        match self.upload(store).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error saving document: {}", e);
                false
            }
        }
    }
}
