//! Multipart upload integration tests

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderValue, StatusCode};
use axum_test::multipart::{MultipartForm, Part};

use audiodiary::backend::storage::{DocumentStore, StorageError};
use audiodiary::shared::{AdminAuthMode, Entry, Store};

use crate::common::{
    admin_password_header, admin_secret_header, audio_form, authorization_header, bearer,
    TestApp, ADMIN_PASSWORD,
};

fn admin() -> HeaderValue {
    HeaderValue::from_static(ADMIN_PASSWORD)
}

/// Reads succeed, every write fails
struct UnwritableStore;

#[async_trait]
impl DocumentStore for UnwritableStore {
    fn name(&self) -> &'static str {
        "unwritable"
    }

    async fn try_load(&self) -> Result<Store, StorageError> {
        Ok(Store::default())
    }

    async fn save(&self, _store: &Store) -> bool {
        false
    }
}

async fn upload_error(app: &TestApp, form: MultipartForm) -> String {
    let response = app
        .server
        .post("/api/admin/upload")
        .add_header(admin_password_header(), admin())
        .multipart(form)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.json::<serde_json::Value>()["error"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_upload_requires_admin() {
    let app = TestApp::new().await;
    app.setup_admin().await;

    app.server
        .post("/api/upload")
        .multipart(audio_form("Nope", "a.mp3", "audio/mpeg", b"data"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    assert!(app.audio_files().is_empty());
}

#[tokio::test]
async fn test_upload_with_session_token() {
    let app = TestApp::new().await;
    app.setup_admin().await;
    let token = app.token().await;

    let response = app
        .server
        .post("/api/admin/upload")
        .add_header(authorization_header(), bearer(&token))
        .multipart(audio_form("Evening", "Evening Walk.M4A", "audio/x-m4a", b"m4a bytes"))
        .await;
    response.assert_status_ok();

    let entry: Entry = response.json();
    assert!(entry.audio_url.starts_with("/audio/"));
    assert!(entry.audio_url.ends_with(".m4a"));

    let files = app.audio_files();
    assert_eq!(files.len(), 1);
    assert!(entry.audio_url.ends_with(&files[0]));

    // the stored file is served back under /audio
    let audio = app.server.get(&entry.audio_url).await;
    audio.assert_status_ok();
    assert_eq!(&audio.as_bytes()[..], b"m4a bytes");
}

#[tokio::test]
async fn test_upload_validation_messages() {
    let app = TestApp::new().await;
    app.setup_admin().await;

    let no_file = MultipartForm::new().add_text("title", "Missing");
    assert_eq!(upload_error(&app, no_file).await, "No audio file provided");

    let wrong_type = audio_form("Doc", "notes.txt", "text/plain", b"hello");
    assert_eq!(
        upload_error(&app, wrong_type).await,
        "Invalid file type. Only MP3, M4A, and WAV are allowed."
    );

    let no_title = MultipartForm::new().add_part(
        "audio",
        Part::bytes(b"RIFF".to_vec())
            .file_name("clip.wav")
            .mime_type("audio/wav"),
    );
    assert_eq!(upload_error(&app, no_title).await, "Title is required");

    assert!(app.audio_files().is_empty());
}

#[tokio::test]
async fn test_upload_size_limit() {
    let app = TestApp::with_config(|builder| builder.max_audio_bytes(16)).await;
    app.setup_admin().await;

    let oversized = audio_form("Long", "long.mp3", "audio/mpeg", &[0u8; 17]);
    assert_eq!(upload_error(&app, oversized).await, "Audio file too large");

    let fits = audio_form("Short", "short.mp3", "audio/mpeg", &[0u8; 16]);
    app.server
        .post("/api/upload")
        .add_header(admin_password_header(), admin())
        .multipart(fits)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_failed_save_discards_audio() {
    let app = TestApp::with_document_store(Arc::new(UnwritableStore), |builder| {
        builder.admin_auth(AdminAuthMode::SharedSecret {
            secret: "s3cret".into(),
        })
    });

    let response = app
        .server
        .post("/api/upload")
        .add_header(admin_secret_header(), HeaderValue::from_static("s3cret"))
        .multipart(audio_form("Lost", "lost.mp3", "audio/mpeg", b"data"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<serde_json::Value>()["error"],
        "Storage operation failed"
    );
    assert!(app.audio_files().is_empty());
}
