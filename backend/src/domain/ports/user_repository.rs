//! Port abstraction for reading users and the points leaderboard.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

/// Read access to users.
///
/// Balances are only written through
/// [`RegistrationRepository::record`](super::RegistrationRepository::record).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Users ordered by points descending, then creation time, then id.
    async fn top_by_points(&self, limit: usize) -> Result<Vec<User>, UserRepositoryError>;
}

/// Fixture implementation for tests that never touch users.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn top_by_points(&self, _limit: usize) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }
}
