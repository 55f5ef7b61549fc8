//! Application settings loaded via OrthoConfig.
//!
//! Values come from `TRAVEL_*` environment variables, a configuration file or
//! command-line flags, in OrthoConfig's usual precedence.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_POOL_TIMEOUT_SECS: u64 = 30;
/// Two weeks, the lifetime browsers are told to keep a session cookie.
const DEFAULT_SESSION_TTL_SECS: u64 = 14 * 24 * 60 * 60;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("database pool size must be at least 1")]
    EmptyPool,
    #[error("session lifetime must be at least one second")]
    EmptySessionTtl,
}

/// Runtime configuration for the API server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TRAVEL")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_pool_timeout_secs: Option<u64>,
    /// Path to the cookie signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy: `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Permit a generated session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Seconds a session cookie stays valid.
    pub session_ttl_secs: Option<u64>,
}

impl AppSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    pub fn db_pool_size(&self) -> Result<u32, SettingsError> {
        match self.db_pool_size.unwrap_or(DEFAULT_POOL_SIZE) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    pub fn db_pool_timeout(&self) -> Duration {
        Duration::from_secs(
            self.db_pool_timeout_secs
                .unwrap_or(DEFAULT_POOL_TIMEOUT_SECS),
        )
    }

    pub fn session_ttl(&self) -> Result<Duration, SettingsError> {
        match self.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS) {
            0 => Err(SettingsError::EmptySessionTtl),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}
