/**
 * Server Initialization
 *
 * Turns a validated [`AppConfig`] into a ready-to-serve router.
 *
 * # Initialization Process
 *
 * 1. Open the document store (the file backend creates its file)
 * 2. Open the blob store (the local backend creates its directory)
 * 3. Create the snapshot broadcast channel
 * 4. Wrap the document store in the repository, attaching the channel when
 *    real-time push is enabled
 * 5. Build the services and the router
 *
 * Unlike optional services elsewhere, a storage backend that cannot be
 * opened stops startup.
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::{AdminService, SessionKeys};
use crate::backend::diary::DiaryService;
use crate::backend::error::BackendError;
use crate::backend::realtime::new_broadcast;
use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::backend::storage::{open_blob_store, open_document_store, DocumentStore, BlobStore, StoreRepository};
use crate::shared::AppConfig;

/// Create and configure the Axum application
pub async fn create_app(config: AppConfig) -> Result<Router, BackendError> {
    let state = build_state(config).await?;
    Ok(create_router(state))
}

/// Open the configured backends and assemble the application state
pub async fn build_state(config: AppConfig) -> Result<AppState, BackendError> {
    tracing::info!("Initializing audio diary backend");

    let documents = open_document_store(&config.store).await?;
    let blobs = open_blob_store(&config.blobs, &config.upload).await?;
    Ok(assemble_state(config, documents, blobs))
}

/// Assemble the state around already opened backends
pub fn assemble_state(
    config: AppConfig,
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
) -> AppState {
    let realtime_broadcast = new_broadcast();

    let mut repository = StoreRepository::new(documents);
    if config.realtime {
        repository = repository.with_notifier(realtime_broadcast.clone());
        tracing::info!("Real-time push enabled");
    }

    let sessions = SessionKeys::new(&config.session_secret, config.session_ttl_hours);
    let admin = AdminService::new(
        repository.clone(),
        sessions,
        config.admin_auth.clone(),
        config.bcrypt_cost,
    );
    let diary = DiaryService::new(repository.clone(), blobs);

    AppState {
        config: Arc::new(config),
        repository,
        diary,
        admin,
        realtime_broadcast,
    }
}
