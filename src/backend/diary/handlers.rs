/**
 * Diary Handlers
 *
 * HTTP handlers for entries, comments and analytics. Most operations are
 * reachable two ways: with the entry id in a JSON body (`/api/play`,
 * `/api/comment`, `/api/delete`) or in the path (`/api/entries/{id}/...`,
 * `/api/admin/entries/{id}`). Both shapes call the same service method.
 *
 * Admin-only handlers take `AdminGuard` as their first argument so the
 * credential check runs before the body is parsed.
 */
use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::auth::handlers::types::SuccessResponse;
use crate::backend::diary::service::DiaryService;
use crate::backend::error::BackendError;
use crate::backend::middleware::AdminGuard;
use crate::shared::{AnalyticsSummary, Comment, Entry};

/// Body naming one entry
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct EntryIdRequest {
    pub entry_id: Option<String>,
}

/// Body of a new comment; `entryId` is only read by `/api/comment`
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub entry_id: Option<String>,
    pub text: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayResponse {
    pub success: bool,
    pub plays: u64,
}

/// GET /api/entries
pub async fn list_entries(State(diary): State<DiaryService>) -> Json<Vec<Entry>> {
    Json(diary.list_public().await)
}

/// POST /api/play
pub async fn record_play(
    State(diary): State<DiaryService>,
    Json(request): Json<EntryIdRequest>,
) -> Result<Json<PlayResponse>, BackendError> {
    let entry_id = request.entry_id.unwrap_or_default();
    play(&diary, &entry_id).await
}

/// POST /api/entries/{id}/play
pub async fn record_play_by_path(
    State(diary): State<DiaryService>,
    Path(entry_id): Path<String>,
) -> Result<Json<PlayResponse>, BackendError> {
    play(&diary, &entry_id).await
}

async fn play(diary: &DiaryService, entry_id: &str) -> Result<Json<PlayResponse>, BackendError> {
    let plays = diary.record_play(entry_id).await?;
    Ok(Json(PlayResponse {
        success: true,
        plays,
    }))
}

/// GET /api/entries/{id}/comments
pub async fn list_comments(
    State(diary): State<DiaryService>,
    Path(entry_id): Path<String>,
) -> Result<Json<Vec<Comment>>, BackendError> {
    Ok(Json(diary.list_comments(&entry_id).await?))
}

/// POST /api/comment
pub async fn add_comment(
    State(diary): State<DiaryService>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<Comment>, BackendError> {
    let entry_id = request.entry_id.unwrap_or_default();
    let text = request.text.unwrap_or_default();
    Ok(Json(diary.add_comment(&entry_id, &text).await?))
}

/// POST /api/entries/{id}/comments
pub async fn add_comment_by_path(
    State(diary): State<DiaryService>,
    Path(entry_id): Path<String>,
    Json(request): Json<CommentRequest>,
) -> Result<Json<Comment>, BackendError> {
    let text = request.text.unwrap_or_default();
    Ok(Json(diary.add_comment(&entry_id, &text).await?))
}

/// POST /api/visit, POST /api/analytics/visit
pub async fn record_visit(
    State(diary): State<DiaryService>,
) -> Result<Json<SuccessResponse>, BackendError> {
    diary.record_visit().await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/delete (admin)
pub async fn delete_entry(
    _guard: AdminGuard,
    State(diary): State<DiaryService>,
    Json(request): Json<EntryIdRequest>,
) -> Result<Json<SuccessResponse>, BackendError> {
    let entry_id = request.entry_id.unwrap_or_default();
    diary.delete_entry(&entry_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/admin/entries/{id} (admin)
pub async fn delete_entry_by_path(
    _guard: AdminGuard,
    State(diary): State<DiaryService>,
    Path(entry_id): Path<String>,
) -> Result<Json<SuccessResponse>, BackendError> {
    diary.delete_entry(&entry_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// DELETE /api/admin/entries/{entryId}/comments/{commentId} (admin)
pub async fn delete_comment(
    _guard: AdminGuard,
    State(diary): State<DiaryService>,
    Path((entry_id, comment_id)): Path<(String, String)>,
) -> Result<Json<SuccessResponse>, BackendError> {
    diary.delete_comment(&entry_id, &comment_id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// GET /api/analytics, GET /api/admin/analytics (admin)
pub async fn analytics(
    _guard: AdminGuard,
    State(diary): State<DiaryService>,
) -> Json<AnalyticsSummary> {
    Json(diary.analytics_summary().await)
}
