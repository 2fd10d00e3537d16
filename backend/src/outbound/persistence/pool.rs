//! Async connection pool for the passport repositories.
//!
//! Wraps `diesel-async` and `bb8`. Checkout waits at most the configured
//! timeout; a pool that cannot hand out a connection surfaces as
//! [`PoolError::Unavailable`], which the repositories report as a retryable
//! connection failure.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};

/// Default upper bound on pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
/// Default wait for a free connection before giving up.
pub const DEFAULT_CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures raised while building or borrowing from the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection could be borrowed in time.
    #[error("database connection unavailable: {message}")]
    Unavailable { message: String },

    /// The pool itself could not be created.
    #[error("database pool setup failed: {message}")]
    Setup { message: String },
}

impl PoolError {
    fn unavailable(cause: impl ToString) -> Self {
        Self::Unavailable {
            message: cause.to_string(),
        }
    }

    fn setup(cause: impl ToString) -> Self {
        Self::Setup {
            message: cause.to_string(),
        }
    }

    /// Human-readable cause, whichever stage failed.
    pub fn message(&self) -> &str {
        match self {
            Self::Unavailable { message } | Self::Setup { message } => message,
        }
    }
}

/// Connection settings for [`DbPool`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use backend::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://passport@localhost/passport")
///     .with_max_size(16)
///     .with_checkout_timeout(Duration::from_secs(2));
/// assert_eq!(config.max_size(), 16);
/// assert_eq!(config.checkout_timeout(), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    checkout_timeout: Duration,
}

impl PoolConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_CONNECTIONS,
            checkout_timeout: DEFAULT_CHECKOUT_TIMEOUT,
        }
    }

    /// Cap the pool size; zero is raised to one.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size.max(1);
        self
    }

    pub fn with_checkout_timeout(mut self, timeout: Duration) -> Self {
        self.checkout_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn checkout_timeout(&self) -> Duration {
        self.checkout_timeout
    }
}

/// Shared async PostgreSQL pool. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. Connections are opened lazily on first checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Setup`] when bb8 rejects the configuration.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolConfig {
            database_url,
            max_size,
            checkout_timeout,
        } = config;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

        Pool::builder()
            .max_size(max_size)
            .connection_timeout(checkout_timeout)
            .build(manager)
            .await
            .map(|inner| Self { inner })
            .map_err(PoolError::setup)
    }

    /// Borrow a connection for the duration of one repository call.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Unavailable`] when the checkout timeout elapses or
    /// the server refuses the connection.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner.get().await.map_err(PoolError::unavailable)
    }
}
