//! Server settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `PASSPORT_*` environment variables over an
//! optional configuration file. Every field is optional so a bare `passport`
//! invocation starts a development server on the in-memory store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use backend::domain::ports::UidConsumption;
use backend::domain::{DEFAULT_LOCK_TIMEOUT, DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT};
use backend::outbound::persistence::{DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Unprefixed variable honoured when no key file is configured.
pub const SESSION_KEY_FILE_ENV: &str = "SESSION_KEY_FILE";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address does not parse as `host:port`.
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
}

/// Configuration for the passport server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PASSPORT")]
pub struct PassportSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Milliseconds to wait for a pooled connection.
    pub db_checkout_timeout_ms: Option<u64>,
    /// Bound on waiting for the per-user lock, in milliseconds.
    pub lock_timeout_ms: Option<u64>,
    /// Deactivate a UID once any user has registered with it.
    #[ortho_config(default = false)]
    pub deactivate_uid_on_use: bool,
    /// Ranking size when the request does not specify one.
    pub ranking_default_limit: Option<usize>,
    /// Start without applying pending migrations.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
    /// JSON seed for the in-memory store; ignored when a database is set.
    pub memory_seed_file: Option<PathBuf>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `SameSite` policy for session cookies (`Strict`, `Lax` or `None`).
    pub session_same_site: Option<String>,
    /// Permit a generated session key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
}

impl PassportSettings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool size, never below one connection.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
            .max(1)
    }

    /// Pool checkout wait.
    pub fn db_checkout_timeout(&self) -> Duration {
        self.db_checkout_timeout_ms
            .map_or(DEFAULT_CHECKOUT_TIMEOUT, Duration::from_millis)
    }

    /// Lock wait bound shared by the in-process locks and the store.
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout_ms
            .map_or(DEFAULT_LOCK_TIMEOUT, Duration::from_millis)
    }

    /// UID consumption policy for successful registrations.
    pub fn uid_consumption(&self) -> UidConsumption {
        if self.deactivate_uid_on_use {
            UidConsumption::Deactivate
        } else {
            UidConsumption::Keep
        }
    }

    /// Default ranking size, clamped to the supported range.
    pub fn ranking_default_limit(&self) -> usize {
        self.ranking_default_limit
            .unwrap_or(DEFAULT_RANKING_LIMIT)
            .clamp(1, MAX_RANKING_LIMIT)
    }

    /// Key file path: the configured one, then `SESSION_KEY_FILE`, then the
    /// mounted secret path.
    pub fn session_key_path<E: Env>(&self, env: &E) -> PathBuf {
        self.session_key_file
            .clone()
            .or_else(|| env.string(SESSION_KEY_FILE_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }
}
