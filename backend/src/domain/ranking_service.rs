//! Leaderboard read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::Error;
use crate::domain::ports::{RankingEntry, RankingQuery, UserRepository, UserRepositoryError};

/// Default number of leaderboard rows.
pub const DEFAULT_RANKING_LIMIT: usize = 10;
/// Largest accepted leaderboard size.
pub const MAX_RANKING_LIMIT: usize = 100;

/// Resolve a requested limit against the default and the supported range.
///
/// # Examples
/// ```
/// use backend::domain::clamp_ranking_limit;
///
/// assert_eq!(clamp_ranking_limit(None, 10), 10);
/// assert_eq!(clamp_ranking_limit(Some(0), 10), 1);
/// assert_eq!(clamp_ranking_limit(Some(500), 10), 100);
/// ```
pub fn clamp_ranking_limit(requested: Option<usize>, default: usize) -> usize {
    requested
        .unwrap_or(default)
        .clamp(1, MAX_RANKING_LIMIT)
}

/// Service implementing [`RankingQuery`].
pub struct RankingService<U> {
    users: Arc<U>,
    default_limit: usize,
}

impl<U> RankingService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self {
            users,
            default_limit: DEFAULT_RANKING_LIMIT,
        }
    }

    /// Override the limit used when callers do not specify one.
    #[must_use]
    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        self.default_limit = clamp_ranking_limit(Some(default_limit), DEFAULT_RANKING_LIMIT);
        self
    }
}

#[async_trait]
impl<U> RankingQuery for RankingService<U>
where
    U: UserRepository,
{
    async fn top(&self, limit: Option<usize>) -> Result<Vec<RankingEntry>, Error> {
        let limit = clamp_ranking_limit(limit, self.default_limit);
        let users = self
            .users
            .top_by_points(limit)
            .await
            .map_err(|err| match err {
                UserRepositoryError::Connection { message } => {
                    Error::service_unavailable(format!("user repository unavailable: {message}"))
                }
                UserRepositoryError::Query { message } => {
                    Error::internal(format!("user repository error: {message}"))
                }
            })?;

        Ok(users
            .into_iter()
            .take(limit)
            .map(|user| RankingEntry {
                display_name: user.display_name().as_ref().to_owned(),
                points: user.points(),
                role: user.role(),
            })
            .collect())
    }
}
