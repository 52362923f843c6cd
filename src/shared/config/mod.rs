//! Application configuration module
//!
//! Provides the configuration types for the diary server: which document
//! store and blob store to use, how admin requests are authenticated, upload
//! limits, CORS origins and the static front-end directory.
//!
//! The types deserialize from TOML (every section is optional) and can be
//! assembled in code with [`AppConfigBuilder`]. Loading from files and the
//! environment lives in `backend::server::config`.
//!
//! ```rust
//! use audiodiary::shared::config::{AppConfig, StoreBackend};
//!
//! let config = AppConfig::builder()
//!     .port(8080)
//!     .store(StoreBackend::Memory)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.port, 8080);
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Default port, as the self-hosted deployment
pub const DEFAULT_PORT: u16 = 3000;

/// Upload ceiling enforced by the local blob store
pub const DEFAULT_MAX_AUDIO_BYTES: u64 = 50 * 1024 * 1024;

/// Default session token lifetime
pub const DEFAULT_SESSION_TTL_HOURS: u64 = 24;

/// bcrypt cost used for new hashes
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// MIME types accepted by the local blob store
pub fn default_audio_types() -> Vec<String> {
    ["audio/mpeg", "audio/mp4", "audio/wav", "audio/x-m4a"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Where the diary document lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum StoreBackend {
    /// One JSON file on local disk
    File { path: PathBuf },
    /// One JSON object in a remote HTTP object store
    Object {
        base_url: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_document_key")]
        document_key: String,
    },
    /// Three keys in a REST key-value service
    Kv { base_url: String, token: String },
    /// In-process only, lost on restart
    Memory,
}

impl Default for StoreBackend {
    fn default() -> Self {
        Self::File {
            path: PathBuf::from("./server/storage/data.json"),
        }
    }
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::File { .. } => "file",
            Self::Object { .. } => "object",
            Self::Kv { .. } => "kv",
            Self::Memory => "memory",
        }
    }
}

pub fn default_document_key() -> String {
    "diary_db.json".to_string()
}

/// Where uploaded audio binaries live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum BlobBackend {
    /// Files under a local directory, served at `/audio`
    Local { dir: PathBuf },
    /// Objects in a remote HTTP object store
    Remote {
        base_url: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_blob_folder")]
        folder: String,
        /// Base of the URLs handed to browsers; defaults to `base_url`
        #[serde(default)]
        public_base_url: Option<String>,
    },
}

impl Default for BlobBackend {
    fn default() -> Self {
        Self::Local {
            dir: PathBuf::from("./server/storage/audio"),
        }
    }
}

impl BlobBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local { .. } => "local",
            Self::Remote { .. } => "remote",
        }
    }
}

pub fn default_blob_folder() -> String {
    "audio-diary".to_string()
}

/// How admin-only requests prove who they are
///
/// `Password` bcrypt-verifies the raw password against the stored
/// credentials. `SharedSecret` compares a static secret from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum AdminAuthMode {
    #[default]
    Password,
    SharedSecret { secret: String },
}

/// Limits applied to uploads by blob stores that enforce them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadLimits {
    pub max_audio_bytes: u64,
    pub allowed_audio_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_audio_bytes: DEFAULT_MAX_AUDIO_BYTES,
            allowed_audio_types: default_audio_types(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreBackend,
    pub blobs: BlobBackend,
    pub admin_auth: AdminAuthMode,
    /// HMAC key for admin session tokens
    pub session_secret: String,
    pub session_ttl_hours: u64,
    /// Allowed CORS origins; empty allows any origin without credentials
    pub cors_origins: Vec<String>,
    pub upload: UploadLimits,
    /// Static front-end served for unmatched paths
    pub static_dir: PathBuf,
    /// Push entry updates over WebSocket
    pub realtime: bool,
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            store: StoreBackend::default(),
            blobs: BlobBackend::default(),
            admin_auth: AdminAuthMode::default(),
            session_secret: random_secret(),
            session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            cors_origins: Vec::new(),
            upload: UploadLimits::default(),
            static_dir: PathBuf::from("public"),
            realtime: true,
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.store {
            StoreBackend::Object { base_url, document_key, .. } => {
                check_url(base_url)?;
                if document_key.trim().is_empty() {
                    return Err(ConfigError::MissingValue("store.document_key"));
                }
            }
            StoreBackend::Kv { base_url, token } => {
                check_url(base_url)?;
                if token.trim().is_empty() {
                    return Err(ConfigError::MissingValue("store.token"));
                }
            }
            StoreBackend::File { path } => {
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::MissingValue("store.path"));
                }
            }
            StoreBackend::Memory => {}
        }

        match &self.blobs {
            BlobBackend::Remote { base_url, public_base_url, .. } => {
                check_url(base_url)?;
                if let Some(public) = public_base_url {
                    check_url(public)?;
                }
            }
            BlobBackend::Local { dir } => {
                if dir.as_os_str().is_empty() {
                    return Err(ConfigError::MissingValue("blobs.dir"));
                }
            }
        }

        if let AdminAuthMode::SharedSecret { secret } = &self.admin_auth {
            if secret.is_empty() {
                return Err(ConfigError::MissingValue("admin_auth.secret"));
            }
        }

        if self.session_secret.is_empty() {
            return Err(ConfigError::MissingValue("session_secret"));
        }
        if self.session_ttl_hours == 0 {
            return Err(ConfigError::Invalid("session_ttl_hours must be positive".into()));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }
        if self.upload.max_audio_bytes == 0 {
            return Err(ConfigError::Invalid("upload.max_audio_bytes must be positive".into()));
        }
        for origin in &self.cors_origins {
            check_url(origin)?;
        }
        Ok(())
    }
}

fn check_url(url: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidUrl(url.to_string()))
    }
}

/// Per-process random secret, used when none is configured
pub fn random_secret() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: Option<AppConfig>,
}

impl AppConfigBuilder {
    fn config(&mut self) -> &mut AppConfig {
        self.config.get_or_insert_with(AppConfig::default)
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config().port = port;
        self
    }

    pub fn store(mut self, store: StoreBackend) -> Self {
        self.config().store = store;
        self
    }

    pub fn blobs(mut self, blobs: BlobBackend) -> Self {
        self.config().blobs = blobs;
        self
    }

    pub fn admin_auth(mut self, mode: AdminAuthMode) -> Self {
        self.config().admin_auth = mode;
        self
    }

    pub fn session_secret(mut self, secret: impl Into<String>) -> Self {
        self.config().session_secret = secret.into();
        self
    }

    pub fn session_ttl_hours(mut self, hours: u64) -> Self {
        self.config().session_ttl_hours = hours;
        self
    }

    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.config().cors_origins = origins;
        self
    }

    pub fn max_audio_bytes(mut self, bytes: u64) -> Self {
        self.config().upload.max_audio_bytes = bytes;
        self
    }

    pub fn allowed_audio_types(mut self, types: Vec<String>) -> Self {
        self.config().upload.allowed_audio_types = types;
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config().static_dir = dir.into();
        self
    }

    pub fn realtime(mut self, enabled: bool) -> Self {
        self.config().realtime = enabled;
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config().bcrypt_cost = cost;
        self
    }

    /// Build and validate the configuration
    pub fn build(mut self) -> Result<AppConfig, ConfigError> {
        let config = self.config().clone();
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value: {0}")]
    Invalid(String),
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
