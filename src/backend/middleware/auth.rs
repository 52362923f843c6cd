/**
 * Admin Guard
 *
 * Admin-only handlers take an [`AdminGuard`] argument. Extraction collects
 * whatever credentials the request carries and lets `AdminService` decide:
 *
 * - `Authorization: Bearer <token>` - session token from login
 * - `X-Admin-Password` header or `adminPassword` query parameter
 * - `X-Admin-Secret` header or `adminSecret` query parameter
 *
 * A failed check rejects with 401 before the handler runs, so upload bodies
 * are never read for unauthenticated requests.
 */

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::auth::PresentedCredentials;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";
pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";
pub const ADMIN_PASSWORD_QUERY: &str = "adminPassword";
pub const ADMIN_SECRET_QUERY: &str = "adminSecret";

/// Proof that the request passed the admin check
#[derive(Clone, Debug)]
pub struct AdminGuard;

impl FromRequestParts<AppState> for AdminGuard {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = presented_credentials(parts);
        if state.admin.authenticate(&presented).await {
            Ok(AdminGuard)
        } else {
            tracing::warn!("Rejected admin request to {}", parts.uri.path());
            Err(BackendError::unauthorized("Unauthorized"))
        }
    }
}

/// Collect credentials from headers first, then the query string
pub fn presented_credentials(parts: &Parts) -> PresentedCredentials {
    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .map(|Query(query)| query)
        .unwrap_or_default();

    PresentedCredentials {
        bearer_token: header_value(&parts.headers, AUTHORIZATION.as_str())
            .and_then(|value| value.strip_prefix("Bearer ").map(str::to_string)),
        password: header_value(&parts.headers, ADMIN_PASSWORD_HEADER)
            .map(str::to_string)
            .or_else(|| query.get(ADMIN_PASSWORD_QUERY).cloned()),
        secret: header_value(&parts.headers, ADMIN_SECRET_HEADER)
            .map(str::to_string)
            .or_else(|| query.get(ADMIN_SECRET_QUERY).cloned()),
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}
