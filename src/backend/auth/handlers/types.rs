/**
 * Admin Handler Types
 *
 * Request and response bodies for the `/api/admin/...` endpoints. Request
 * fields are optional so that a missing field is answered with a 400 and a
 * readable message instead of a deserialization rejection.
 */

use serde::{Deserialize, Serialize};

/// Setup request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SetupRequest {
    pub password: Option<String>,
    pub security_question: Option<String>,
    /// Compared case- and whitespace-insensitively on reset
    pub security_answer: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct LoginRequest {
    pub password: Option<String>,
}

/// Password reset request
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResetRequest {
    pub security_answer: Option<String>,
    pub new_password: Option<String>,
}

/// Answer of `GET /api/admin/check`
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetupStatus {
    pub is_setup: bool,
    pub security_question: Option<String>,
}

/// Success flag with a human readable message
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Successful login, carrying the session token
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

/// Bare success flag
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
