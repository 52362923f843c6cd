/**
 * Admin Session Tokens
 *
 * Login issues an HS256 JWT that later admin requests send as
 * `Authorization: Bearer <token>` instead of the raw password.
 *
 * The `cred` claim carries the generation of the admin credentials the token
 * was issued against: their random `sessionEpoch`, which setup and every
 * reset replace. The guard rejects tokens whose generation no longer
 * matches, so a password reset invalidates every earlier token.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Subject of every admin token
pub const ADMIN_SUBJECT: &str = "admin";

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Always `admin`
    pub sub: String,
    /// Credentials generation the token was issued against
    pub cred: String,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Signing keys and lifetime for admin tokens
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: u64,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: ttl_hours.saturating_mul(60 * 60),
        }
    }

    /// Create a token bound to the given credentials generation
    pub fn create_token(&self, generation: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = now_secs();
        self.encode_claims(&Claims {
            sub: ADMIN_SUBJECT.to_string(),
            cred: generation.to_string(),
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        })
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        encode(&Header::default(), claims, &self.encoding)
    }

    /// Verify signature, expiry and subject; return the claims
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::default();
        validation.sub = Some(ADMIN_SUBJECT.to_string());
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(token_data.claims)
    }
}

fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
