//! WebSocket push integration tests

use axum::http::StatusCode;
use serde_json::json;

use audiodiary::shared::RealtimeEvent;

use crate::common::TestApp;

#[tokio::test]
async fn test_socket_receives_init_then_updates() {
    let app = TestApp::new().await;
    app.setup_admin().await;
    let entry = app.upload("Live").await;

    let mut socket = app
        .server
        .get_websocket("/ws")
        .await
        .into_websocket()
        .await;

    let init: RealtimeEvent = socket.receive_json().await;
    assert_eq!(init.kind(), "init");
    assert_eq!(init.entries().len(), 1);
    assert_eq!(init.entries()[0].plays, 0);

    app.server
        .post("/api/play")
        .json(&json!({ "entryId": entry.id }))
        .await
        .assert_status_ok();

    let update: RealtimeEvent = socket.receive_json().await;
    assert_eq!(update.kind(), "update");
    assert_eq!(update.entries()[0].id, entry.id);
    assert_eq!(update.entries()[0].plays, 1);
}

#[tokio::test]
async fn test_socket_never_carries_hidden_entries() {
    let app = TestApp::new().await;
    app.setup_admin().await;
    app.upload("Private").await;

    let mut socket = app
        .server
        .get_websocket("/ws")
        .await
        .into_websocket()
        .await;
    let _init: RealtimeEvent = socket.receive_json().await;

    app.state
        .repository
        .update(|store| {
            store.entries[0].hidden = true;
            Ok(())
        })
        .await
        .unwrap();

    let update: RealtimeEvent = socket.receive_json().await;
    assert!(update.entries().is_empty());
}

#[tokio::test]
async fn test_socket_route_absent_when_disabled() {
    let app = TestApp::with_config(|builder| builder.realtime(false)).await;

    app.server
        .get("/ws")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
