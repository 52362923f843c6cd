/**
 * Upload Validation
 *
 * Turns the raw multipart fields into an [`AudioUpload`], applying the
 * limits of the configured blob store. Checks run in this order:
 *
 * 1. an `audio` file part is present and not empty
 * 2. its MIME type is whitelisted (when the store has a whitelist)
 * 3. its size is within the ceiling (when the store has one)
 * 4. `title` is present and not blank
 *
 * `duration` is optional; anything that does not parse as a number is 0.
 */

use bytes::Bytes;

use crate::backend::diary::AudioUpload;
use crate::backend::error::BackendError;
use crate::backend::storage::UploadPolicy;
use crate::shared::entry::parse_duration;

/// The file part of an upload
#[derive(Debug, Clone, Default)]
pub struct AudioPart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Multipart fields as received
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub audio: Option<AudioPart>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

pub fn validate_upload(form: UploadForm, policy: &UploadPolicy) -> Result<AudioUpload, BackendError> {
    let audio = form
        .audio
        .filter(|audio| !audio.data.is_empty())
        .ok_or_else(|| BackendError::bad_request("No audio file provided"))?;

    if let Some(allowed) = &policy.allowed_types {
        let content_type = audio.content_type.as_deref().unwrap_or_default();
        if !allowed.iter().any(|t| t.eq_ignore_ascii_case(content_type)) {
            tracing::warn!("Rejected upload with content type {:?}", audio.content_type);
            return Err(BackendError::bad_request(
                "Invalid file type. Only MP3, M4A, and WAV are allowed.",
            ));
        }
    }

    if let Some(max_bytes) = policy.max_bytes {
        if audio.data.len() as u64 > max_bytes {
            tracing::warn!("Rejected upload of {} bytes", audio.data.len());
            return Err(BackendError::bad_request("Audio file too large"));
        }
    }

    let title = form
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BackendError::bad_request("Title is required"))?;

    Ok(AudioUpload {
        title,
        description: form.description.unwrap_or_default().trim().to_string(),
        duration: parse_duration(form.duration.as_deref()),
        file_name: audio.file_name,
        content_type: audio.content_type,
        data: audio.data,
    })
}
