//! Per-user exclusive sections for registration.
//!
//! Each user id maps to its own Tokio mutex, so attempts by one user
//! serialise in arrival order while different users never contend. Waiting is
//! bounded; callers that exceed the configured timeout get
//! [`LockTimeoutError`] and may retry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::UserId;

/// Default bound on how long a caller waits for a user's lock.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Raised when the per-user lock could not be obtained in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("timed out after {waited:?} waiting for user lock")]
pub struct LockTimeoutError {
    pub waited: Duration,
}

type LockMap = HashMap<UserId, Arc<AsyncMutex<()>>>;

/// Keyed lock registry.
///
/// Entries are created on demand and removed once no holder or waiter
/// references them.
#[derive(Debug, Clone)]
pub struct UserLocks {
    entries: Arc<Mutex<LockMap>>,
    timeout: Duration,
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl UserLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    /// Configured wait bound.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Wait for exclusive control over `user_id`.
    ///
    /// The returned guard releases the lock when dropped.
    pub async fn acquire(&self, user_id: &UserId) -> Result<UserLockGuard, LockTimeoutError> {
        let entry = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(user_id.clone()).or_default())
        };

        match tokio::time::timeout(self.timeout, entry.lock_owned()).await {
            Ok(guard) => Ok(UserLockGuard {
                guard: Some(guard),
                user_id: user_id.clone(),
                entries: Arc::clone(&self.entries),
            }),
            Err(_) => {
                // The timed-out future has already released its handle.
                evict_if_idle(&self.entries, user_id);
                Err(LockTimeoutError {
                    waited: self.timeout,
                })
            }
        }
    }

    /// Number of users with a live holder or waiter.
    pub fn tracked_users(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Holds a user's exclusive section until dropped.
#[derive(Debug)]
pub struct UserLockGuard {
    guard: Option<OwnedMutexGuard<()>>,
    user_id: UserId,
    entries: Arc<Mutex<LockMap>>,
}

impl UserLockGuard {
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        // Release first so the map's reference count reflects only waiters.
        drop(self.guard.take());
        evict_if_idle(&self.entries, &self.user_id);
    }
}

fn evict_if_idle(entries: &Mutex<LockMap>, user_id: &UserId) {
    let mut entries = entries.lock().unwrap_or_else(PoisonError::into_inner);
    let idle = entries
        .get(user_id)
        .is_some_and(|entry| Arc::strong_count(entry) == 1);
    if idle {
        entries.remove(user_id);
    }
}
