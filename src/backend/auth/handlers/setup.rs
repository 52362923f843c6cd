/**
 * Setup Handlers
 *
 * - `GET /api/admin/check` tells the front-end whether to show the setup
 *   form or the login form, and which security question to ask on reset
 * - `POST /api/admin/setup` creates the admin credentials once
 * - `POST /api/admin/reset` replaces the password after the security answer
 *   is confirmed
 */
use axum::{extract::State, response::Json};

use crate::backend::auth::credentials::AdminService;
use crate::backend::auth::handlers::types::{
    MessageResponse, ResetRequest, SetupRequest, SetupStatus,
};
use crate::backend::error::BackendError;

pub async fn check_setup(State(admin): State<AdminService>) -> Json<SetupStatus> {
    Json(admin.check_setup().await)
}

/// Setup handler
///
/// # Errors
///
/// * `409 Conflict` - admin already configured (credentials unchanged)
/// * `400 Bad Request` - a field is missing or blank
pub async fn setup(
    State(admin): State<AdminService>,
    Json(request): Json<SetupRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    admin
        .setup(
            request.password.as_deref().unwrap_or_default(),
            request.security_question.as_deref().unwrap_or_default(),
            request.security_answer.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(MessageResponse::ok("Admin setup complete")))
}

/// Reset handler
///
/// # Errors
///
/// * `400 Bad Request` - a field is missing or blank
/// * `401 Unauthorized` - wrong security answer
/// * `404 Not Found` - admin not set up yet
pub async fn reset_password(
    State(admin): State<AdminService>,
    Json(request): Json<ResetRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    admin
        .reset_password(
            request.security_answer.as_deref().unwrap_or_default(),
            request.new_password.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok(Json(MessageResponse::ok("Password reset successful")))
}
