//! Driving port for administrative experience mutations.

use async_trait::async_trait;

use crate::domain::{Error, ExperienceId};

use super::{CascadeSummary, ExperienceDetail};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExperienceAdminCommand: Send + Sync {
    /// Change the configured award. Non-positive values fall back to the
    /// default award.
    async fn update_points(
        &self,
        experience_id: ExperienceId,
        points: i64,
    ) -> Result<ExperienceDetail, Error>;

    async fn set_visibility(
        &self,
        experience_id: ExperienceId,
        visible: bool,
    ) -> Result<ExperienceDetail, Error>;

    /// Delete the experience with its UIDs and registrations. Balances are
    /// not adjusted.
    async fn delete_cascade(&self, experience_id: ExperienceId) -> Result<CascadeSummary, Error>;
}

/// Fixture command with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureExperienceAdminCommand;

fn missing(experience_id: ExperienceId) -> Error {
    Error::not_found(format!("experience {experience_id} not found"))
}

#[async_trait]
impl ExperienceAdminCommand for FixtureExperienceAdminCommand {
    async fn update_points(
        &self,
        experience_id: ExperienceId,
        _points: i64,
    ) -> Result<ExperienceDetail, Error> {
        Err(missing(experience_id))
    }

    async fn set_visibility(
        &self,
        experience_id: ExperienceId,
        _visible: bool,
    ) -> Result<ExperienceDetail, Error> {
        Err(missing(experience_id))
    }

    async fn delete_cascade(&self, experience_id: ExperienceId) -> Result<CascadeSummary, Error> {
        Err(missing(experience_id))
    }
}
