//! Driving port for the points leaderboard.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, UserRole};

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub display_name: String,
    pub points: u32,
    pub role: UserRole,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RankingQuery: Send + Sync {
    /// Top users by points. `None` applies the configured default; explicit
    /// values are clamped to the supported range.
    async fn top(&self, limit: Option<usize>) -> Result<Vec<RankingEntry>, Error>;
}

/// Fixture query with an empty leaderboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRankingQuery;

#[async_trait]
impl RankingQuery for FixtureRankingQuery {
    async fn top(&self, _limit: Option<usize>) -> Result<Vec<RankingEntry>, Error> {
        Ok(Vec::new())
    }
}
