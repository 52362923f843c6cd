//! Admin account API integration tests
//!
//! Setup, login, reset and the three ways of proving admin identity.

use axum::http::{HeaderValue, StatusCode};
use serde_json::json;

use audiodiary::shared::AdminAuthMode;

use crate::common::{
    admin_password_header, admin_secret_header, authorization_header, bearer, TestApp,
    ADMIN_PASSWORD,
};

#[tokio::test]
async fn test_check_before_and_after_setup() {
    let app = TestApp::new().await;

    let body: serde_json::Value = app.server.get("/api/admin/check").await.json();
    assert_eq!(body, json!({ "isSetup": false, "securityQuestion": null }));

    app.setup_admin().await;

    let body: serde_json::Value = app.server.get("/api/admin/check").await.json();
    assert_eq!(body, json!({ "isSetup": true, "securityQuestion": "pet?" }));
}

#[tokio::test]
async fn test_second_setup_conflicts() {
    let app = TestApp::new().await;
    app.setup_admin().await;
    let before = app.state.repository.load().await.admin;

    let response = app
        .server
        .post("/api/admin/setup")
        .json(&json!({
            "password": "other",
            "securityQuestion": "color?",
            "securityAnswer": "blue",
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Admin already setup");
    assert_eq!(app.state.repository.load().await.admin, before);
}

#[tokio::test]
async fn test_setup_requires_all_fields() {
    let app = TestApp::new().await;

    let response = app
        .server
        .post("/api/admin/setup")
        .json(&json!({ "password": "abc123", "securityQuestion": "pet?" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_login_outcomes() {
    let app = TestApp::new().await;

    app.login(ADMIN_PASSWORD)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.setup_admin().await;

    app.login("").await.assert_status(StatusCode::BAD_REQUEST);
    app.login("wrong").await.assert_status(StatusCode::UNAUTHORIZED);

    let response = app.login(ADMIN_PASSWORD).await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn test_password_reset_scenario() {
    let app = TestApp::new().await;
    app.setup_admin().await;
    let old_token = app.token().await;

    app.server
        .post("/api/admin/reset")
        .json(&json!({ "securityAnswer": "Cat", "newPassword": "xyz789" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/admin/reset")
        .json(&json!({ "securityAnswer": " rex ", "newPassword": "xyz789" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Password reset successful");

    app.login("xyz789").await.assert_status_ok();
    app.login(ADMIN_PASSWORD)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // tokens issued before the reset no longer verify
    app.server
        .post("/api/admin/verify")
        .add_header(authorization_header(), bearer(&old_token))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reset_before_setup() {
    let app = TestApp::new().await;

    app.server
        .post("/api/admin/reset")
        .json(&json!({ "securityAnswer": "rex", "newPassword": "xyz789" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verify_accepts_token_password_and_query() {
    let app = TestApp::new().await;
    app.setup_admin().await;
    let token = app.token().await;

    app.server
        .post("/api/admin/verify")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/api/admin/verify")
        .add_header(authorization_header(), bearer(&token))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>(), json!({ "success": true }));

    app.server
        .post("/api/admin/verify")
        .add_header(admin_password_header(), HeaderValue::from_static(ADMIN_PASSWORD))
        .await
        .assert_status_ok();

    app.server
        .post("/api/admin/verify")
        .add_query_param("adminPassword", ADMIN_PASSWORD)
        .await
        .assert_status_ok();

    app.server
        .post("/api/admin/verify")
        .add_header(authorization_header(), bearer("not-a-token"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shared_secret_mode() {
    let app = TestApp::with_config(|builder| {
        builder.admin_auth(AdminAuthMode::SharedSecret {
            secret: "s3cret".into(),
        })
    })
    .await;

    app.server
        .get("/api/analytics")
        .add_header(admin_secret_header(), HeaderValue::from_static("s3cret"))
        .await
        .assert_status_ok();

    app.server
        .get("/api/analytics")
        .add_query_param("adminSecret", "s3cret")
        .await
        .assert_status_ok();

    app.server
        .get("/api/analytics")
        .add_header(admin_secret_header(), HeaderValue::from_static("guess"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    // the raw password scheme is not consulted in shared-secret mode
    app.setup_admin().await;
    app.server
        .get("/api/analytics")
        .add_header(admin_password_header(), HeaderValue::from_static(ADMIN_PASSWORD))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
