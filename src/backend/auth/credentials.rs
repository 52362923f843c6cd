/**
 * Admin Credential Service
 *
 * The diary has exactly one admin. Its credentials record moves through two
 * states:
 *
 * ```text
 * Unconfigured --setup--> Configured --reset--> Configured
 * ```
 *
 * and is never deleted.
 *
 * # Hashing
 *
 * The password and the lower-cased, trimmed security answer are stored as
 * bcrypt hashes. Hashing and verification run on the blocking thread pool.
 *
 * # Request Authentication
 *
 * [`AdminService::authenticate`] accepts, in order:
 *
 * 1. a session token issued by login, still matching the current credentials
 * 2. the configured scheme: the raw password (`Password` mode) or the static
 *    shared secret (`SharedSecret` mode)
 */

use crate::backend::auth::handlers::types::SetupStatus;
use crate::backend::auth::sessions::SessionKeys;
use crate::backend::error::BackendError;
use crate::backend::storage::StoreRepository;
use crate::shared::config::AdminAuthMode;
use crate::shared::ids::now_iso8601;
use crate::shared::AdminCredentials;

/// Credentials as presented by one request, before any check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresentedCredentials {
    pub bearer_token: Option<String>,
    pub password: Option<String>,
    pub secret: Option<String>,
}

#[derive(Clone)]
pub struct AdminService {
    repository: StoreRepository,
    sessions: SessionKeys,
    mode: AdminAuthMode,
    bcrypt_cost: u32,
}

impl AdminService {
    pub fn new(
        repository: StoreRepository,
        sessions: SessionKeys,
        mode: AdminAuthMode,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            repository,
            sessions,
            mode,
            bcrypt_cost,
        }
    }

    pub fn mode(&self) -> &AdminAuthMode {
        &self.mode
    }

    pub async fn check_setup(&self) -> SetupStatus {
        let admin = self.repository.load().await.admin;
        SetupStatus {
            is_setup: admin.is_some(),
            security_question: admin.map(|a| a.security_question),
        }
    }

    /// Create the admin credentials; fails with Conflict once configured
    pub async fn setup(
        &self,
        password: &str,
        security_question: &str,
        security_answer: &str,
    ) -> Result<(), BackendError> {
        if self.repository.try_load().await?.admin.is_some() {
            tracing::warn!("Rejected admin setup: already configured");
            return Err(BackendError::conflict("Admin already setup"));
        }
        if password.is_empty()
            || security_question.trim().is_empty()
            || security_answer.trim().is_empty()
        {
            return Err(BackendError::bad_request("Missing required fields"));
        }

        let password_hash = self.hash(password.to_string()).await?;
        let security_answer_hash = self.hash(normalize_answer(security_answer)).await?;
        let credentials = AdminCredentials {
            password_hash,
            security_question: security_question.trim().to_string(),
            security_answer_hash,
            created_at: now_iso8601(),
            updated_at: None,
            session_epoch: AdminCredentials::new_session_epoch(),
        };

        self.repository
            .update(move |store| {
                // a concurrent setup may have won while we were hashing
                if store.admin.is_some() {
                    return Err(BackendError::conflict("Admin already setup"));
                }
                store.admin = Some(credentials);
                Ok(())
            })
            .await?;

        tracing::info!("Admin credentials configured");
        Ok(())
    }

    /// Check the admin password and issue a session token
    pub async fn login(&self, password: &str) -> Result<String, BackendError> {
        if password.is_empty() {
            return Err(BackendError::bad_request("Password required"));
        }
        let admin = self.configured().await?;

        if !self.verify(password.to_string(), admin.password_hash.clone()).await? {
            tracing::warn!("Admin login failed: invalid password");
            return Err(BackendError::unauthorized("Invalid password"));
        }

        let token = self.sessions.create_token(admin.generation()).map_err(|e| {
            tracing::error!("Failed to create token: {:?}", e);
            BackendError::internal("Login failed")
        })?;

        tracing::info!("Admin logged in");
        Ok(token)
    }

    /// Replace the password after checking the security answer
    pub async fn reset_password(
        &self,
        security_answer: &str,
        new_password: &str,
    ) -> Result<(), BackendError> {
        if security_answer.trim().is_empty() || new_password.is_empty() {
            return Err(BackendError::bad_request("Missing required fields"));
        }
        let admin = self.configured().await?;

        let answer_ok = self
            .verify(normalize_answer(security_answer), admin.security_answer_hash.clone())
            .await?;
        if !answer_ok {
            tracing::warn!("Password reset failed: invalid security answer");
            return Err(BackendError::unauthorized("Invalid security answer"));
        }

        let password_hash = self.hash(new_password.to_string()).await?;
        self.repository
            .update(move |store| {
                let admin = store
                    .admin
                    .as_mut()
                    .ok_or_else(|| BackendError::not_found("Admin not setup"))?;
                admin.password_hash = password_hash;
                admin.updated_at = Some(now_iso8601());
                admin.session_epoch = AdminCredentials::new_session_epoch();
                Ok(())
            })
            .await?;

        tracing::info!("Admin password reset");
        Ok(())
    }

    /// Per-request guard for admin-only endpoints
    pub async fn authenticate(&self, presented: &PresentedCredentials) -> bool {
        if let Some(token) = &presented.bearer_token {
            if self.token_is_current(token).await {
                return true;
            }
        }

        match &self.mode {
            AdminAuthMode::Password => {
                let Some(password) = presented.password.as_deref().filter(|p| !p.is_empty())
                else {
                    return false;
                };
                let Some(admin) = self.repository.load().await.admin else {
                    return false;
                };
                self.verify(password.to_string(), admin.password_hash)
                    .await
                    .unwrap_or(false)
            }
            AdminAuthMode::SharedSecret { secret } => presented
                .secret
                .as_deref()
                .is_some_and(|given| constant_time_eq(given.as_bytes(), secret.as_bytes())),
        }
    }

    async fn token_is_current(&self, token: &str) -> bool {
        let claims = match self.sessions.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("Rejected session token: {}", e);
                return false;
            }
        };
        match self.repository.load().await.admin {
            Some(admin) => admin.generation() == claims.cred,
            None => false,
        }
    }

    async fn configured(&self) -> Result<AdminCredentials, BackendError> {
        self.repository
            .try_load()
            .await?
            .admin
            .ok_or_else(|| BackendError::not_found("Admin not setup"))
    }

    async fn hash(&self, secret: String) -> Result<String, BackendError> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(secret, cost))
            .await
            .map_err(|e| {
                tracing::error!("Hashing task failed: {}", e);
                BackendError::internal("Internal server error")
            })?
            .map_err(|e| {
                tracing::error!("Password hashing error: {:?}", e);
                BackendError::internal("Internal server error")
            })
    }

    async fn verify(&self, secret: String, hash: String) -> Result<bool, BackendError> {
        tokio::task::spawn_blocking(move || bcrypt::verify(secret, &hash))
            .await
            .map_err(|e| {
                tracing::error!("Verification task failed: {}", e);
                BackendError::internal("Internal server error")
            })?
            .map_err(|e| {
                tracing::error!("Password verification error: {:?}", e);
                BackendError::internal("Internal server error")
            })
    }
}

/// Security answers match regardless of case and surrounding whitespace
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Equality whose running time does not depend on where the inputs differ
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
