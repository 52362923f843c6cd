/**
 * Login Handlers
 *
 * - `POST /api/admin/login` checks the password and returns a session token
 * - `POST /api/admin/verify` answers `{success: true}` when the request
 *   passes the admin guard, letting the front-end test stored credentials
 *
 * # Security
 *
 * - Passwords are verified with bcrypt and never logged
 * - The returned token expires after the configured session lifetime and
 *   stops working after a password reset
 */
use axum::{extract::State, response::Json};

use crate::backend::auth::credentials::AdminService;
use crate::backend::auth::handlers::types::{LoginRequest, LoginResponse, SuccessResponse};
use crate::backend::error::BackendError;
use crate::backend::middleware::AdminGuard;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - password missing or empty
/// * `401 Unauthorized` - password does not match
/// * `404 Not Found` - admin not set up yet
///
/// # Example Request
///
/// ```http
/// POST /api/admin/login HTTP/1.1
/// Content-Type: application/json
///
/// {"password": "abc123"}
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Login successful",
///   "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..."
/// }
/// ```
pub async fn login(
    State(admin): State<AdminService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, BackendError> {
    let password = request.password.unwrap_or_default();
    let token = admin.login(&password).await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
    }))
}

/// Verify handler; the guard does all the work
pub async fn verify(_guard: AdminGuard) -> Json<SuccessResponse> {
    Json(SuccessResponse::ok())
}
