/**
 * Error Conversion
 *
 * `BackendError` implements Axum's `IntoResponse`, so handlers return it
 * directly. Error responses are JSON:
 *
 * ```json
 * {
 *   "error": "Entry not found",
 *   "status": 404
 * }
 * ```
 *
 * Server-side failures are logged here with their full detail before the
 * generic message is sent.
 */

use axum::{
    response::{IntoResponse, Json, Response},
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
