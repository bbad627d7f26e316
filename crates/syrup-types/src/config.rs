//! Server configuration.
//!
//! `ServerConfig` represents the optional `config.toml` passed to the
//! `syrupd` binary. All fields have sensible defaults; the JWT secret
//! and database URL can also come from `SYRUP_JWT_SECRET` /
//! `SYRUP_DATABASE_URL` environment variables (handled at the binary
//! boundary).

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Syrup backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite database URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum concurrent read connections in the database pool.
    #[serde(default = "default_max_read_connections")]
    pub max_read_connections: u32,

    /// Symmetric signing key for session tokens. The default exists
    /// only so local development works out of the box.
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl_minutes")]
    pub access_ttl_minutes: i64,

    /// Refresh token lifetime in days.
    #[serde(default = "default_refresh_ttl_days")]
    pub refresh_ttl_days: i64,

    /// Cookie name carrying the access token.
    #[serde(default = "default_access_cookie")]
    pub access_cookie_name: String,

    /// Cookie name carrying the refresh token.
    #[serde(default = "default_refresh_cookie")]
    pub refresh_cookie_name: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "sqlite://syrup.db?mode=rwc".to_string()
}

fn default_max_read_connections() -> u32 {
    8
}

fn default_jwt_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_access_ttl_minutes() -> i64 {
    15
}

fn default_refresh_ttl_days() -> i64 {
    7
}

fn default_access_cookie() -> String {
    "access_token".to_string()
}

fn default_refresh_cookie() -> String {
    "refresh_token".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: default_database_url(),
            max_read_connections: default_max_read_connections(),
            jwt_secret: default_jwt_secret(),
            access_ttl_minutes: default_access_ttl_minutes(),
            refresh_ttl_days: default_refresh_ttl_days(),
            access_cookie_name: default_access_cookie(),
            refresh_cookie_name: default_refresh_cookie(),
        }
    }
}

impl ServerConfig {
    /// Access token lifetime in seconds (cookie Max-Age).
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_minutes * 60
    }

    /// Refresh token lifetime in seconds (cookie Max-Age).
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl_days * 24 * 3600
    }
}
