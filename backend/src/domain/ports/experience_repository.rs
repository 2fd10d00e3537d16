//! Port for the experience catalogue and its administrative mutations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Experience, ExperienceId, PointsAwarded};

use super::define_port_error;

define_port_error! {
    /// Errors raised by experience repository adapters.
    pub enum ExperienceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "experience repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "experience repository query failed: {message}",
    }
}

/// Rows removed by a cascading experience delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeSummary {
    pub uids_removed: u64,
    pub registrations_removed: u64,
}

/// Port for experience reads and admin writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceRepository: Send + Sync {
    /// Find an experience by id regardless of visibility.
    async fn find_by_id(
        &self,
        id: ExperienceId,
    ) -> Result<Option<Experience>, ExperienceRepositoryError>;

    /// Replace the configured award. Returns `None` when the experience is
    /// missing. Existing registrations keep their snapshot.
    async fn update_points(
        &self,
        id: ExperienceId,
        points: PointsAwarded,
    ) -> Result<Option<Experience>, ExperienceRepositoryError>;

    /// Toggle catalogue visibility. Returns `None` when missing.
    async fn set_visibility(
        &self,
        id: ExperienceId,
        visible: bool,
    ) -> Result<Option<Experience>, ExperienceRepositoryError>;

    /// Delete the experience with its UIDs and registrations in one unit of
    /// work. Returns `None` when missing.
    async fn delete_cascade(
        &self,
        id: ExperienceId,
    ) -> Result<Option<CascadeSummary>, ExperienceRepositoryError>;
}

/// Fixture implementation with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExperienceRepository;

#[async_trait]
impl ExperienceRepository for FixtureExperienceRepository {
    async fn find_by_id(
        &self,
        _id: ExperienceId,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        Ok(None)
    }

    async fn update_points(
        &self,
        _id: ExperienceId,
        _points: PointsAwarded,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        Ok(None)
    }

    async fn set_visibility(
        &self,
        _id: ExperienceId,
        _visible: bool,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        Ok(None)
    }

    async fn delete_cascade(
        &self,
        _id: ExperienceId,
    ) -> Result<Option<CascadeSummary>, ExperienceRepositoryError> {
        Ok(None)
    }
}
