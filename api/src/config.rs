//! Centralized configuration management.
//!
//! All environment variables are read and validated once at startup.
//! Nothing else in the service calls `env::var()`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required {0} env var")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port (default: 13200)
    pub port: u16,
    /// HTTP server bind address (default: "0.0.0.0")
    pub ip: String,
    /// SQLite database URL (default: "sqlite:trackbridge.db")
    pub database_url: String,
    /// Redis URL for the search counter. In-memory counter when unset.
    pub redis_url: Option<String>,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub deezer_api_base: String,
    pub spotify_api_base: String,
    pub spotify_auth_base: String,
    /// Per-attempt timeout for upstream calls (default: 15s)
    pub upstream_timeout: Duration,
    /// Counterpart searches in flight per playlist (default: 8)
    pub search_concurrency: usize,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            port: parse_or(get("PORT"), "PORT", 13200)?,
            ip: get("IP").unwrap_or_else(|| "0.0.0.0".to_string()),
            database_url: get("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:trackbridge.db".to_string()),
            redis_url: get("REDIS_URL"),
            spotify_client_id: required("SPOTIFY_CLIENT_ID")?,
            spotify_client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            deezer_api_base: get("DEEZER_API_BASE")
                .unwrap_or_else(|| "https://api.deezer.com".to_string()),
            spotify_api_base: get("SPOTIFY_API_BASE")
                .unwrap_or_else(|| "https://api.spotify.com/v1".to_string()),
            spotify_auth_base: get("SPOTIFY_AUTH_BASE")
                .unwrap_or_else(|| "https://accounts.spotify.com".to_string()),
            upstream_timeout: Duration::from_secs(parse_or(
                get("UPSTREAM_TIMEOUT_SECS"),
                "UPSTREAM_TIMEOUT_SECS",
                15,
            )?),
            search_concurrency: parse_or(get("SEARCH_CONCURRENCY"), "SEARCH_CONCURRENCY", 8)?,
        })
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
