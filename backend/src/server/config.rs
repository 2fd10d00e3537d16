//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use backend::domain::ports::UidConsumption;
use backend::domain::{DEFAULT_LOCK_TIMEOUT, DEFAULT_RANKING_LIMIT};
use backend::outbound::memory::InMemoryPassportStore;
use backend::outbound::persistence::DbPool;

/// Tunables for the registration engine and ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub lock_timeout: Duration,
    pub consumption: UidConsumption,
    pub ranking_default_limit: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            consumption: UidConsumption::Keep,
            ranking_default_limit: DEFAULT_RANKING_LIMIT,
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) memory_store: Option<Arc<InMemoryPassportStore>>,
    pub(crate) engine: EngineOptions,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            memory_store: None,
            engine: EngineOptions::default(),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the server runs on the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Serve from a prepared in-memory store when no pool is attached.
    #[must_use]
    pub fn with_memory_store(mut self, store: Arc<InMemoryPassportStore>) -> Self {
        self.memory_store = Some(store);
        self
    }

    /// Override the registration engine and ranking tunables.
    #[must_use]
    pub fn with_engine(mut self, engine: EngineOptions) -> Self {
        self.engine = engine;
        self
    }
}
