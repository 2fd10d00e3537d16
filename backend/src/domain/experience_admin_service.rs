//! Administrative experience mutations.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CascadeSummary, ExperienceAdminCommand, ExperienceDetail, ExperienceRepository,
    ExperienceRepositoryError,
};
use crate::domain::{Error, ExperienceId, PointsAwarded};

fn map_repository_error(error: ExperienceRepositoryError) -> Error {
    match error {
        ExperienceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("experience repository unavailable: {message}"))
        }
        ExperienceRepositoryError::Query { message } => {
            Error::internal(format!("experience repository error: {message}"))
        }
    }
}

fn out_of_range(points: i64) -> Error {
    Error::invalid_request(format!(
        "points must not exceed {}, got {points}",
        PointsAwarded::MAX
    ))
    .with_details(json!({ "field": "points", "max": PointsAwarded::MAX.value() }))
}

fn missing(experience_id: ExperienceId) -> Error {
    Error::not_found(format!("experience {experience_id} not found"))
}

/// Service implementing [`ExperienceAdminCommand`].
pub struct ExperienceAdminService<X> {
    experiences: Arc<X>,
}

impl<X> ExperienceAdminService<X> {
    pub fn new(experiences: Arc<X>) -> Self {
        Self { experiences }
    }
}

#[async_trait]
impl<X> ExperienceAdminCommand for ExperienceAdminService<X>
where
    X: ExperienceRepository,
{
    async fn update_points(
        &self,
        experience_id: ExperienceId,
        points: i64,
    ) -> Result<ExperienceDetail, Error> {
        if points > i64::from(PointsAwarded::MAX.value()) {
            return Err(out_of_range(points));
        }
        let points = PointsAwarded::from_configured(Some(points));
        let updated = self
            .experiences
            .update_points(experience_id, points)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| missing(experience_id))?;

        info!(experience_id = %experience_id, points = points.value(), "experience points updated");
        Ok(ExperienceDetail::from(&updated))
    }

    async fn set_visibility(
        &self,
        experience_id: ExperienceId,
        visible: bool,
    ) -> Result<ExperienceDetail, Error> {
        let updated = self
            .experiences
            .set_visibility(experience_id, visible)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| missing(experience_id))?;
        Ok(ExperienceDetail::from(&updated))
    }

    async fn delete_cascade(&self, experience_id: ExperienceId) -> Result<CascadeSummary, Error> {
        let summary = self
            .experiences
            .delete_cascade(experience_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| missing(experience_id))?;

        info!(
            experience_id = %experience_id,
            uids_removed = summary.uids_removed,
            registrations_removed = summary.registrations_removed,
            "experience deleted"
        );
        Ok(summary)
    }
}
