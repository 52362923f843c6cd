/**
 * Upload Handler
 *
 * `POST /api/upload` and `POST /api/admin/upload` accept a multipart body:
 *
 * - `audio` - the recording (file part)
 * - `title` - required
 * - `description` - optional
 * - `duration` - optional, whole seconds
 *
 * The admin guard runs first; unauthenticated requests are rejected before
 * the body is read. The created entry is returned as JSON.
 */
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::diary::DiaryService;
use crate::backend::error::BackendError;
use crate::backend::middleware::AdminGuard;
use crate::backend::upload::validation::{validate_upload, AudioPart, UploadForm};
use crate::shared::Entry;

pub async fn upload_audio(
    _guard: AdminGuard,
    State(diary): State<DiaryService>,
    multipart: Multipart,
) -> Result<Json<Entry>, BackendError> {
    let form = read_form(multipart).await?;
    let upload = validate_upload(form, &diary.blobs().upload_policy())?;
    let entry = diary.publish_upload(upload).await?;
    Ok(Json(entry))
}

/// Collect the known fields; unknown fields are skipped
async fn read_form(mut multipart: Multipart) -> Result<UploadForm, BackendError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.audio = Some(AudioPart {
                    file_name,
                    content_type,
                    data,
                });
            }
            "title" => form.title = Some(field.text().await.map_err(multipart_error)?),
            "description" => form.description = Some(field.text().await.map_err(multipart_error)?),
            "duration" => form.duration = Some(field.text().await.map_err(multipart_error)?),
            other => tracing::debug!("Ignoring upload field {:?}", other),
        }
    }

    Ok(form)
}

fn multipart_error(err: MultipartError) -> BackendError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload exceeded the body limit");
        BackendError::bad_request("Audio file too large")
    } else {
        tracing::warn!("Failed to parse upload: {}", err.body_text());
        BackendError::bad_request("Failed to parse form data")
    }
}
