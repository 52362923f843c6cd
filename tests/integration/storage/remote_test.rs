//! Remote document and blob stores against mock HTTP services

use axum::http::StatusCode;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use audiodiary::backend::error::BackendError;
use audiodiary::backend::storage::{
    open_blob_store, open_document_store, StorageError, StoreRepository,
};
use audiodiary::shared::{Analytics, BlobBackend, Entry, Store, StoreBackend, UploadLimits};

use crate::common::{TestApp, ADMIN_PASSWORD, SECURITY_ANSWER, SECURITY_QUESTION};

fn sample_store() -> Store {
    Store {
        entries: vec![Entry::new(
            "1700000000000".into(),
            "First".into(),
            "hello".into(),
            "https://cdn.example.com/audio-diary/a.mp3".into(),
            12,
        )],
        ..Store::default()
    }
}

fn object_backend(server: &MockServer) -> StoreBackend {
    StoreBackend::Object {
        base_url: server.uri(),
        token: Some("object-token".into()),
        document_key: "diary_db.json".into(),
    }
}

#[tokio::test]
async fn test_object_store_missing_document_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/diary_db.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let store = open_document_store(&object_backend(&server)).await.unwrap();
    assert_eq!(store.load().await, Store::default());
}

#[tokio::test]
async fn test_object_store_reads_and_writes_document() {
    let server = MockServer::start().await;
    let document = sample_store();

    Mock::given(method("GET"))
        .and(path("/diary_db.json"))
        .and(header("authorization", "Bearer object-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&document))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/diary_db.json"))
        .and(header("authorization", "Bearer object-token"))
        .and(header("content-type", "application/json"))
        .and(body_json(&document))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let store = open_document_store(&object_backend(&server)).await.unwrap();
    assert_eq!(store.name(), "object");
    assert_eq!(store.load().await, document);
    assert!(store.save(&document).await);
}

#[tokio::test]
async fn test_object_store_failures_degrade() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let store = open_document_store(&object_backend(&server)).await.unwrap();
    assert!(store.try_load().await.is_err());
    assert_eq!(store.load().await, Store::default());
    assert!(!store.save(&sample_store()).await);
}

#[tokio::test]
async fn test_object_store_failed_read_aborts_update() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/diary_db.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let repo = StoreRepository::new(open_document_store(&object_backend(&server)).await.unwrap());
    let result = repo
        .update(|store| {
            *store
                .analytics
                .daily_visits
                .entry("2024-01-01".to_string())
                .or_insert(0) += 1;
            Ok(())
        })
        .await;

    assert!(matches!(
        result,
        Err(BackendError::Storage(StorageError::Status { status: 503, .. }))
    ));
}

#[tokio::test]
async fn test_object_store_unparseable_document_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let store = open_document_store(&object_backend(&server)).await.unwrap();
    assert!(matches!(store.try_load().await, Err(StorageError::Decode(_))));
    assert_eq!(store.load().await, Store::default());
}

#[tokio::test]
async fn test_kv_store_reads_keys() {
    let server = MockServer::start().await;
    let document = sample_store();
    let entries_json = serde_json::to_string(&document.entries).unwrap();

    Mock::given(method("GET"))
        .and(path("/get/entries"))
        .and(header("authorization", "Bearer kv-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": entries_json })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get/analytics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;

    let store = open_document_store(&StoreBackend::Kv {
        base_url: server.uri(),
        token: "kv-token".into(),
    })
    .await
    .unwrap();

    let loaded = store.try_load().await.unwrap();
    assert_eq!(loaded.entries, document.entries);
    assert_eq!(loaded.analytics, Analytics::default());
    assert_eq!(loaded.admin, None);
}

#[tokio::test]
async fn test_kv_store_failed_admin_read_blocks_setup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get/admin"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "OK" })))
        .expect(0)
        .mount(&server)
        .await;

    let documents = open_document_store(&StoreBackend::Kv {
        base_url: server.uri(),
        token: "kv-token".into(),
    })
    .await
    .unwrap();
    assert!(documents.try_load().await.is_err());

    let app = TestApp::with_document_store(documents, |builder| builder);
    let response = app
        .server
        .post("/api/admin/setup")
        .json(&json!({
            "password": ADMIN_PASSWORD,
            "securityQuestion": SECURITY_QUESTION,
            "securityAnswer": SECURITY_ANSWER,
        }))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<serde_json::Value>()["error"], "Storage operation failed");

    let visit = app.server.post("/api/visit").await;
    visit.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_kv_store_writes_every_key() {
    let server = MockServer::start().await;
    for key in ["entries", "analytics", "admin"] {
        Mock::given(method("POST"))
            .and(path(format!("/set/{}", key)))
            .and(header("authorization", "Bearer kv-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "OK" })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let store = open_document_store(&StoreBackend::Kv {
        base_url: server.uri(),
        token: "kv-token".into(),
    })
    .await
    .unwrap();

    assert!(store.save(&sample_store()).await);
}

#[tokio::test]
async fn test_kv_store_partial_write_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/set/analytics"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "OK" })))
        .mount(&server)
        .await;

    let store = open_document_store(&StoreBackend::Kv {
        base_url: server.uri(),
        token: "kv-token".into(),
    })
    .await
    .unwrap();

    assert!(!store.save(&sample_store()).await);
}

#[tokio::test]
async fn test_remote_blob_put_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/audio-diary/\d+-[0-9a-f]{32}\.mp3$"))
        .and(header("authorization", "Bearer blob-token"))
        .and(header("content-type", "audio/mpeg"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/audio-diary/\d+-[0-9a-f]{32}\.mp3$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let blobs = open_blob_store(
        &BlobBackend::Remote {
            base_url: server.uri(),
            token: Some("blob-token".into()),
            folder: "audio-diary".into(),
            public_base_url: Some("https://cdn.example.com".into()),
        },
        &UploadLimits::default(),
    )
    .await
    .unwrap();

    assert_eq!(blobs.upload_policy().max_bytes, None);

    let stored = blobs
        .put(Some("take.mp3"), Some("audio/mpeg"), Bytes::from_static(b"mp3"))
        .await
        .unwrap();
    assert!(stored
        .url
        .starts_with("https://cdn.example.com/audio-diary/"));

    // URLs outside the folder are never sent to the service
    assert!(!blobs
        .delete("https://elsewhere.example.com/audio-diary/x.mp3")
        .await
        .unwrap());
    assert!(blobs.delete(&stored.url).await.unwrap());
}

#[tokio::test]
async fn test_remote_blob_rejected_upload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let blobs = open_blob_store(
        &BlobBackend::Remote {
            base_url: server.uri(),
            token: None,
            folder: "audio-diary".into(),
            public_base_url: None,
        },
        &UploadLimits::default(),
    )
    .await
    .unwrap();

    let result = blobs
        .put(Some("take.mp3"), Some("audio/mpeg"), Bytes::from_static(b"mp3"))
        .await;
    assert!(result.is_err());
}
