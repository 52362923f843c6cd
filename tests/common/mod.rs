//! Common test utilities and helpers
//!
//! - Test application fixtures over an in-memory document store
//! - Admin account helpers
//! - Multipart upload builders

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use serde_json::json;
use tempfile::TempDir;

use audiodiary::backend::routes::create_router;
use audiodiary::backend::server::{assemble_state, build_state, AppState};
use audiodiary::backend::storage::{DocumentStore, LocalBlobStore};
use audiodiary::shared::{AppConfig, AppConfigBuilder, BlobBackend, Entry, StoreBackend};

pub const ADMIN_PASSWORD: &str = "abc123";
pub const SECURITY_QUESTION: &str = "pet?";
pub const SECURITY_ANSWER: &str = "Rex";

/// Configuration shared by the fixtures; bcrypt cost 4 keeps hashing fast
pub fn test_config_builder(audio_dir: &Path, static_dir: &Path) -> AppConfigBuilder {
    AppConfig::builder()
        .store(StoreBackend::Memory)
        .blobs(BlobBackend::Local {
            dir: audio_dir.to_path_buf(),
        })
        .static_dir(static_dir)
        .session_secret("integration-test-secret")
        .bcrypt_cost(4)
}

/// A running router plus the state behind it
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub audio_dir: TempDir,
    pub static_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|builder| builder).await
    }

    pub async fn with_config(configure: impl FnOnce(AppConfigBuilder) -> AppConfigBuilder) -> Self {
        let audio_dir = tempfile::tempdir().unwrap();
        let static_dir = tempfile::tempdir().unwrap();
        let config = configure(test_config_builder(audio_dir.path(), static_dir.path()))
            .build()
            .unwrap();
        let state = build_state(config).await.unwrap();
        Self::serve(state, audio_dir, static_dir)
    }

    /// Application over a caller-supplied document store
    pub fn with_document_store(
        documents: Arc<dyn DocumentStore>,
        configure: impl FnOnce(AppConfigBuilder) -> AppConfigBuilder,
    ) -> Self {
        let audio_dir = tempfile::tempdir().unwrap();
        let static_dir = tempfile::tempdir().unwrap();
        let config = configure(test_config_builder(audio_dir.path(), static_dir.path()))
            .build()
            .unwrap();
        let blobs = Arc::new(LocalBlobStore::new(audio_dir.path(), config.upload.clone()));
        let state = assemble_state(config, documents, blobs);
        Self::serve(state, audio_dir, static_dir)
    }

    fn serve(state: AppState, audio_dir: TempDir, static_dir: TempDir) -> Self {
        let server = TestServer::builder()
            .http_transport()
            .build(create_router(state.clone()))
            .unwrap();
        Self {
            server,
            state,
            audio_dir,
            static_dir,
        }
    }

    /// Create the admin account with the default credentials
    pub async fn setup_admin(&self) {
        self.server
            .post("/api/admin/setup")
            .json(&json!({
                "password": ADMIN_PASSWORD,
                "securityQuestion": SECURITY_QUESTION,
                "securityAnswer": SECURITY_ANSWER,
            }))
            .await
            .assert_status_ok();
    }

    /// Log in and return the session token
    pub async fn login(&self, password: &str) -> TestResponse {
        self.server
            .post("/api/admin/login")
            .json(&json!({ "password": password }))
            .await
    }

    pub async fn token(&self) -> String {
        let response = self.login(ADMIN_PASSWORD).await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        body["token"].as_str().unwrap().to_string()
    }

    /// Upload a small recording as the admin
    pub async fn upload(&self, title: &str) -> Entry {
        let response = self
            .server
            .post("/api/upload")
            .add_header(admin_password_header(), HeaderValue::from_static(ADMIN_PASSWORD))
            .multipart(audio_form(title, "take.mp3", "audio/mpeg", b"ID3 fake mp3"))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// Files currently in the audio directory
    pub fn audio_files(&self) -> Vec<String> {
        std::fs::read_dir(self.audio_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }
}

pub fn admin_password_header() -> HeaderName {
    HeaderName::from_static("x-admin-password")
}

pub fn admin_secret_header() -> HeaderName {
    HeaderName::from_static("x-admin-secret")
}

pub fn authorization_header() -> HeaderName {
    AUTHORIZATION
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {}", token)).unwrap()
}

/// Multipart body with an audio part and a title
pub fn audio_form(title: &str, file_name: &str, mime: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title)
        .add_text("description", "recorded on the train")
        .add_text("duration", "42")
        .add_part(
            "audio",
            Part::bytes(data.to_vec())
                .file_name(file_name)
                .mime_type(mime),
        )
}
