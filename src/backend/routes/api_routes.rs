/**
 * API Routes
 *
 * Both route shapes of the diary are served side by side: the compact
 * serverless shape (`/api/play`, `/api/comment`, `/api/delete`, ...) and the
 * resource shape of the self-hosted server (`/api/entries/{id}/...`,
 * `/api/admin/...`).
 *
 * # Routes
 *
 * ## Public
 * - `GET /api/entries` - visible entries
 * - `POST /api/play`, `POST /api/entries/{id}/play` - count a play
 * - `GET /api/entries/{id}/comments` - comments of one entry
 * - `POST /api/comment`, `POST /api/entries/{id}/comments` - add a comment
 * - `POST /api/visit`, `POST /api/analytics/visit` - count a visit
 *
 * ## Admin account
 * - `GET /api/admin/check`, `POST /api/admin/setup`
 * - `POST /api/admin/login`, `POST /api/admin/reset`
 *
 * ## Admin only
 * - `POST /api/admin/verify`
 * - `POST /api/upload`, `POST /api/admin/upload`
 * - `DELETE /api/delete`, `DELETE /api/admin/entries/{id}`
 * - `DELETE /api/admin/entries/{entryId}/comments/{commentId}`
 * - `GET /api/analytics`, `GET /api/admin/analytics`
 */

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, MethodRouter},
    Router,
};

use crate::backend::auth::handlers::{check_setup, login, reset_password, setup, verify};
use crate::backend::diary::handlers::{
    add_comment, add_comment_by_path, analytics, delete_comment, delete_entry,
    delete_entry_by_path, list_comments, list_entries, record_play, record_play_by_path,
    record_visit,
};
use crate::backend::server::state::AppState;
use crate::backend::upload::upload_audio;
use crate::shared::{AppConfig, BlobBackend};

/// Room for multipart framing and the text fields around the audio part
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Configure API routes
pub fn configure_api_routes(router: Router<AppState>, config: &AppConfig) -> Router<AppState> {
    router
        // Entries and comments
        .route("/api/entries", get(list_entries))
        .route("/api/play", post(record_play))
        .route("/api/entries/{id}/play", post(record_play_by_path))
        .route(
            "/api/entries/{id}/comments",
            get(list_comments).post(add_comment_by_path),
        )
        .route("/api/comment", post(add_comment))
        // Visits
        .route("/api/visit", post(record_visit))
        .route("/api/analytics/visit", post(record_visit))
        // Admin account
        .route("/api/admin/check", get(check_setup))
        .route("/api/admin/setup", post(setup))
        .route("/api/admin/login", post(login))
        .route("/api/admin/reset", post(reset_password))
        .route("/api/admin/verify", post(verify))
        // Admin content management
        .route("/api/upload", upload_route(config))
        .route("/api/admin/upload", upload_route(config))
        .route("/api/delete", delete(delete_entry))
        .route("/api/admin/entries/{id}", delete(delete_entry_by_path))
        .route(
            "/api/admin/entries/{entry_id}/comments/{comment_id}",
            delete(delete_comment),
        )
        .route("/api/analytics", get(analytics))
        .route("/api/admin/analytics", get(analytics))
}

/// Upload route with a body limit matching the blob store
///
/// The local store enforces its size limit, so bodies may only exceed it by
/// the form overhead. Remote stores accept whatever their service accepts.
fn upload_route(config: &AppConfig) -> MethodRouter<AppState> {
    let limit = match &config.blobs {
        BlobBackend::Local { .. } => {
            let max = config.upload.max_audio_bytes.saturating_add(FORM_OVERHEAD_BYTES);
            DefaultBodyLimit::max(usize::try_from(max).unwrap_or(usize::MAX))
        }
        BlobBackend::Remote { .. } => DefaultBodyLimit::disable(),
    };
    post(upload_audio).layer(limit)
}
