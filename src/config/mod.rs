use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::links::slug::{DEFAULT_LENGTH, DEFAULT_MAX_ATTEMPTS, MAX_SLUG_LEN, MIN_SLUG_LEN};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    /// Public origin used to build `short_url` in create responses
    pub base_url: String,
    pub auth: AuthConfig,
    pub slugs: SlugConfig,
    pub redirect_status: RedirectMode,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// When false every admin request is allowed
    pub enabled: bool,
    pub api_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugConfig {
    pub length: usize,
    pub max_attempts: u32,
}

impl Default for SlugConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Status code used for successful redirects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectMode {
    /// 301 Moved Permanently
    Permanent,
    /// 302 Found
    #[default]
    Found,
}

impl RedirectMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "301" | "permanent" => RedirectMode::Permanent,
            "302" | "found" | "temporary" => RedirectMode::Found,
            other => {
                tracing::warn!(
                    "Unknown REDIRECT_STATUS '{other}', falling back to 302. Supported values: 301, 302"
                );
                RedirectMode::Found
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// Directory of static files served for paths no route matches
    pub static_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_str =
            std::env::var("DATABASE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let backend = match backend_str.to_lowercase().as_str() {
            "postgres" | "postgresql" => DatabaseBackend::Postgres,
            _ => DatabaseBackend::Sqlite,
        };

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./slugway.db".to_string());
        let max_connections = env_or("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env_or("PORT", 3006u16)?;

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        let disable_auth = std::env::var("DISABLE_AUTH")
            .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        let api_keys: Vec<String> = std::env::var("ADMIN_API_KEYS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        if !disable_auth && api_keys.is_empty() {
            tracing::warn!("ADMIN_API_KEYS is empty; admin endpoints will reject every request");
        }

        let slug_length = env_or("SLUG_LENGTH", DEFAULT_LENGTH)?;
        if !(MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&slug_length) {
            anyhow::bail!("SLUG_LENGTH must be between {MIN_SLUG_LEN} and {MAX_SLUG_LEN}");
        }
        let max_attempts = env_or("SLUG_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            anyhow::bail!("SLUG_MAX_ATTEMPTS must be at least 1");
        }

        let redirect_status = std::env::var("REDIRECT_STATUS")
            .map(|v| RedirectMode::parse(&v))
            .unwrap_or_default();

        let static_dir = std::env::var("STATIC_DIR").ok();

        Ok(Config {
            database: DatabaseConfig {
                backend,
                url: database_url,
                max_connections,
            },
            server: ServerConfig { host, port },
            base_url,
            auth: AuthConfig {
                enabled: !disable_auth,
                api_keys,
            },
            slugs: SlugConfig {
                length: slug_length,
                max_attempts,
            },
            redirect_status,
            frontend: FrontendConfig { static_dir },
        })
    }
}
