/**
 * Application State Management
 *
 * `AppState` holds the services every handler needs. The `FromRef`
 * implementations let handlers extract just the part they use, e.g.
 * `State(diary): State<DiaryService>`.
 *
 * Every field is cheap to clone: services share their internals through
 * `Arc`, and the broadcast sender is itself a handle.
 *
 * # Example
 *
 * ```rust,no_run
 * use audiodiary::backend::diary::DiaryService;
 * use axum::extract::State;
 *
 * async fn handler(State(diary): State<DiaryService>) -> usize {
 *     diary.list_public().await.len()
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::AdminService;
use crate::backend::diary::DiaryService;
use crate::backend::realtime::RealtimeEventBroadcast;
use crate::backend::storage::StoreRepository;
use crate::shared::AppConfig;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated configuration the server was started with
    pub config: Arc<AppConfig>,

    /// Serialized access to the diary document
    pub repository: StoreRepository,

    /// Entries, comments and analytics
    pub diary: DiaryService,

    /// Admin credentials and the request guard
    pub admin: AdminService,

    /// Snapshot channel for WebSocket subscribers
    pub realtime_broadcast: RealtimeEventBroadcast,
}

impl FromRef<AppState> for StoreRepository {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.repository.clone()
    }
}

impl FromRef<AppState> for DiaryService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.diary.clone()
    }
}

impl FromRef<AppState> for AdminService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.admin.clone()
    }
}

impl FromRef<AppState> for RealtimeEventBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.realtime_broadcast.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}
