/**
 * Server Configuration
 *
 * Builds the [`AppConfig`] the server starts with.
 *
 * # Configuration Sources
 *
 * Later sources win:
 *
 * 1. built-in defaults (local JSON file, local audio directory, port 3000)
 * 2. a TOML file named by `DIARY_CONFIG`
 * 3. environment variables, including those from a `.env` file
 *
 * # Environment Variables
 *
 * | Variable | Meaning |
 * |---|---|
 * | `SERVER_PORT` | listen port |
 * | `STORE_BACKEND` | `file`, `object`, `kv` or `memory` |
 * | `DATA_FILE` | document path for `file` |
 * | `OBJECT_STORE_URL`, `OBJECT_STORE_TOKEN`, `OBJECT_STORE_DOCUMENT` | `object` backend |
 * | `KV_REST_API_URL`, `KV_REST_API_TOKEN` | `kv` backend |
 * | `BLOB_BACKEND` | `local` or `remote` |
 * | `AUDIO_DIR` | directory for `local` |
 * | `BLOB_STORE_URL`, `BLOB_STORE_TOKEN`, `BLOB_STORE_FOLDER`, `BLOB_PUBLIC_URL` | `remote` blobs |
 * | `ADMIN_AUTH`, `ADMIN_SECRET` | `password` or `shared-secret` and its secret |
 * | `SESSION_SECRET`, `SESSION_TTL_HOURS` | session tokens |
 * | `CORS_ORIGINS` | comma separated origins |
 * | `MAX_AUDIO_BYTES`, `STATIC_DIR`, `REALTIME`, `BCRYPT_COST` | misc |
 *
 * The result is validated before it is returned; an invalid configuration
 * stops startup.
 */

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::shared::config::{
    default_blob_folder, default_document_key, AdminAuthMode, AppConfig, BlobBackend,
    ConfigError, StoreBackend,
};

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_FILE_VAR: &str = "DIARY_CONFIG";

/// Load configuration from `.env`, the optional TOML file and the environment
pub fn load_config() -> Result<AppConfig, ConfigError> {
    if dotenv::dotenv().is_ok() {
        tracing::info!("Loaded environment from .env");
    }

    let mut config = match std::env::var(CONFIG_FILE_VAR) {
        Ok(path) => load_config_file(Path::new(&path))?,
        Err(_) => AppConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Parse a TOML configuration file; absent sections keep their defaults
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: AppConfig = toml::from_str(&text)?;
    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Apply variables from `lookup` on top of `config`
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(port) = var("SERVER_PORT") {
        config.port = parse(&port, "SERVER_PORT")?;
    }

    let store_kind = var("STORE_BACKEND").unwrap_or_else(|| config.store.name().to_string());
    config.store = match store_kind.as_str() {
        "file" => {
            let current = match &config.store {
                StoreBackend::File { path } => path.clone(),
                _ => PathBuf::from("./server/storage/data.json"),
            };
            StoreBackend::File {
                path: var("DATA_FILE").map(PathBuf::from).unwrap_or(current),
            }
        }
        "object" => {
            let (url, token, key) = match &config.store {
                StoreBackend::Object {
                    base_url,
                    token,
                    document_key,
                } => (Some(base_url.clone()), token.clone(), document_key.clone()),
                _ => (None, None, default_document_key()),
            };
            StoreBackend::Object {
                base_url: var("OBJECT_STORE_URL")
                    .or(url)
                    .ok_or(ConfigError::MissingValue("OBJECT_STORE_URL"))?,
                token: var("OBJECT_STORE_TOKEN").or(token),
                document_key: var("OBJECT_STORE_DOCUMENT").unwrap_or(key),
            }
        }
        "kv" => {
            let (url, token) = match &config.store {
                StoreBackend::Kv { base_url, token } => {
                    (Some(base_url.clone()), Some(token.clone()))
                }
                _ => (None, None),
            };
            StoreBackend::Kv {
                base_url: var("KV_REST_API_URL")
                    .or(url)
                    .ok_or(ConfigError::MissingValue("KV_REST_API_URL"))?,
                token: var("KV_REST_API_TOKEN")
                    .or(token)
                    .ok_or(ConfigError::MissingValue("KV_REST_API_TOKEN"))?,
            }
        }
        "memory" => StoreBackend::Memory,
        other => {
            return Err(ConfigError::Invalid(format!(
                "STORE_BACKEND must be file, object, kv or memory, got {}",
                other
            )))
        }
    };

    let blob_kind = var("BLOB_BACKEND").unwrap_or_else(|| config.blobs.name().to_string());
    config.blobs = match blob_kind.as_str() {
        "local" => {
            let current = match &config.blobs {
                BlobBackend::Local { dir } => dir.clone(),
                _ => PathBuf::from("./server/storage/audio"),
            };
            BlobBackend::Local {
                dir: var("AUDIO_DIR").map(PathBuf::from).unwrap_or(current),
            }
        }
        "remote" => {
            let (url, token, folder, public) = match &config.blobs {
                BlobBackend::Remote {
                    base_url,
                    token,
                    folder,
                    public_base_url,
                } => (
                    Some(base_url.clone()),
                    token.clone(),
                    folder.clone(),
                    public_base_url.clone(),
                ),
                _ => (None, None, default_blob_folder(), None),
            };
            BlobBackend::Remote {
                base_url: var("BLOB_STORE_URL")
                    .or(url)
                    .ok_or(ConfigError::MissingValue("BLOB_STORE_URL"))?,
                token: var("BLOB_STORE_TOKEN").or(token),
                folder: var("BLOB_STORE_FOLDER").unwrap_or(folder),
                public_base_url: var("BLOB_PUBLIC_URL").or(public),
            }
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "BLOB_BACKEND must be local or remote, got {}",
                other
            )))
        }
    };

    let auth_kind = var("ADMIN_AUTH").unwrap_or_else(|| match &config.admin_auth {
        AdminAuthMode::Password => "password".to_string(),
        AdminAuthMode::SharedSecret { .. } => "shared-secret".to_string(),
    });
    config.admin_auth = match auth_kind.as_str() {
        "password" => AdminAuthMode::Password,
        "shared-secret" => {
            let current = match &config.admin_auth {
                AdminAuthMode::SharedSecret { secret } => Some(secret.clone()),
                AdminAuthMode::Password => None,
            };
            AdminAuthMode::SharedSecret {
                secret: var("ADMIN_SECRET")
                    .or(current)
                    .ok_or(ConfigError::MissingValue("ADMIN_SECRET"))?,
            }
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "ADMIN_AUTH must be password or shared-secret, got {}",
                other
            )))
        }
    };

    if let Some(secret) = var("SESSION_SECRET") {
        config.session_secret = secret;
    }
    if let Some(hours) = var("SESSION_TTL_HOURS") {
        config.session_ttl_hours = parse(&hours, "SESSION_TTL_HOURS")?;
    }
    if let Some(origins) = var("CORS_ORIGINS") {
        config.cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(bytes) = var("MAX_AUDIO_BYTES") {
        config.upload.max_audio_bytes = parse(&bytes, "MAX_AUDIO_BYTES")?;
    }
    if let Some(dir) = var("STATIC_DIR") {
        config.static_dir = PathBuf::from(dir);
    }
    if let Some(flag) = var("REALTIME") {
        config.realtime = parse_flag(&flag)
            .ok_or_else(|| ConfigError::Invalid(format!("REALTIME must be true or false, got {}", flag)))?;
    }
    if let Some(cost) = var("BCRYPT_COST") {
        config.bcrypt_cost = parse(&cost, "BCRYPT_COST")?;
    }

    Ok(())
}

fn parse<T: FromStr>(value: &str, key: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} has an invalid value: {}", key, value)))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
