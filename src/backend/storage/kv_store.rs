/**
 * KV Store Adapter
 *
 * Keeps the document as three keys (`entries`, `analytics`, `admin`) in a
 * REST key-value service:
 *
 * - `GET {base}/get/{key}` answers `{"result": <string|null>}`, where the
 *   string is the JSON of that one field
 * - `POST {base}/set/{key}` stores the request body as the value
 *
 * Every request carries the bearer token. An absent key reads as its
 * default. A key that cannot be read fails the whole read, since `save`
 * rewrites all three keys.
 */

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{DocumentStore, StorageError};
use crate::shared::{AdminCredentials, Analytics, Entry, Store};

const ENTRIES_KEY: &str = "entries";
const ANALYTICS_KEY: &str = "analytics";
const ADMIN_KEY: &str = "admin";

#[derive(Debug, Deserialize)]
struct KvResult {
    result: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KvStore {
    client: Client,
    base_url: String,
    token: String,
}

impl KvStore {
    pub fn new(client: Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let url = format!("{}/get/{}", self.base_url, key);
        let response = self.client.get(&url).bearer_auth(&self.token).send().await?;
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        let body: KvResult = response.json().await?;
        match body.result {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let url = format!("{}/set/{}", self.base_url, key);
        let body = serde_json::to_string(value)?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(StorageError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(())
    }

    /// Read one key; an absent key is the default
    async fn get_or_default<T: DeserializeOwned + Default>(
        &self,
        key: &str,
    ) -> Result<T, StorageError> {
        self.get(key).await.map(Option::unwrap_or_default).map_err(|e| {
            tracing::error!("Error reading key {}: {}", key, e);
            e
        })
    }

    async fn set_logged<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.set(key, value).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Error writing key {}: {}", key, e);
                false
            }
        }
    }
}

#[async_trait]
impl DocumentStore for KvStore {
    fn name(&self) -> &'static str {
        "kv"
    }

    async fn try_load(&self) -> Result<Store, StorageError> {
        let (entries, analytics, admin) = tokio::try_join!(
            self.get_or_default::<Vec<Entry>>(ENTRIES_KEY),
            self.get_or_default::<Analytics>(ANALYTICS_KEY),
            self.get_or_default::<Option<AdminCredentials>>(ADMIN_KEY),
        )?;
        Ok(Store {
            entries,
            analytics,
            admin,
        })
    }

    async fn save(&self, store: &Store) -> bool {
        let (entries, analytics, admin) = tokio::join!(
            self.set_logged(ENTRIES_KEY, &store.entries),
            self.set_logged(ANALYTICS_KEY, &store.analytics),
            self.set_logged(ADMIN_KEY, &store.admin),
        );
        entries && analytics && admin
    }

    async fn replace_entries(&self, entries: Vec<Entry>) -> bool {
        self.set_logged(ENTRIES_KEY, &entries).await
    }

    async fn replace_analytics(&self, analytics: Analytics) -> bool {
        self.set_logged(ANALYTICS_KEY, &analytics).await
    }

    async fn replace_admin_credentials(&self, admin: AdminCredentials) -> bool {
        self.set_logged(ADMIN_KEY, &Some(admin)).await
    }
}
