/**
 * Store Repository
 *
 * Every change to the diary document goes through [`StoreRepository::update`]:
 * the document is loaded, handed to a closure, and saved, all while holding
 * one process-wide async mutex. Two handlers in the same process therefore
 * never overwrite each other's change.
 *
 * # Failure Semantics
 *
 * - If the document cannot be read the update fails with that
 *   `StorageError`, the closure is not run and nothing is written.
 * - If the closure returns an error nothing is written.
 * - If the adapter reports a failed save the update fails with
 *   `StorageError::WriteFailed` and nothing is broadcast.
 * - After a successful save the written snapshot is published as an
 *   `update` event to real-time subscribers (when a notifier is attached).
 *
 * Two server processes sharing one remote document still race; the last
 * writer wins.
 *
 * Reads through [`StoreRepository::load`] and [`StoreRepository::try_load`]
 * take no lock.
 */

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{DocumentStore, StorageError};
use crate::backend::error::BackendError;
use crate::backend::realtime::{broadcast_event, RealtimeEventBroadcast};
use crate::shared::{RealtimeEvent, Store};

#[derive(Clone)]
pub struct StoreRepository {
    store: Arc<dyn DocumentStore>,
    write_lock: Arc<Mutex<()>>,
    notifier: Option<RealtimeEventBroadcast>,
}

impl StoreRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
            notifier: None,
        }
    }

    /// Publish every written snapshot on `notifier`
    pub fn with_notifier(mut self, notifier: RealtimeEventBroadcast) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    /// Current document, read without taking the write lock; empty when the
    /// backend cannot be read
    pub async fn load(&self) -> Store {
        self.store.load().await
    }

    /// Current document, or the backend's read failure
    pub async fn try_load(&self) -> Result<Store, BackendError> {
        Ok(self.store.try_load().await?)
    }

    /// Apply `mutate` to the current document and persist the result
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use audiodiary::backend::storage::StoreRepository;
    /// # use audiodiary::backend::error::BackendError;
    /// # async fn example(repo: StoreRepository) -> Result<(), BackendError> {
    /// let total = repo
    ///     .update(|store| {
    ///         store.analytics.total_plays += 1;
    ///         Ok(store.analytics.total_plays)
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update<T, F>(&self, mutate: F) -> Result<T, BackendError>
    where
        F: FnOnce(&mut Store) -> Result<T, BackendError>,
    {
        let _guard = self.write_lock.lock().await;

        let mut store = self.store.try_load().await.map_err(|e| {
            tracing::error!("Read from {} store failed, not writing: {}", self.store.name(), e);
            e
        })?;
        let output = mutate(&mut store)?;

        if !self.store.save(&store).await {
            tracing::error!("Save to {} store failed", self.store.name());
            return Err(StorageError::WriteFailed.into());
        }

        if let Some(notifier) = &self.notifier {
            broadcast_event(notifier, RealtimeEvent::update(&store)).await;
        }

        Ok(output)
    }
}
