//! PostgreSQL-backed `ExperienceRepository` implementation using Diesel ORM.
//!
//! The cascading delete removes registrations, then UIDs, then the
//! experience inside one transaction so the returned counts are exact even
//! though the foreign keys would cascade on their own.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CascadeSummary, ExperienceRepository, ExperienceRepositoryError};
use crate::domain::{
    Experience, ExperienceCategory, ExperienceDraft, ExperienceId, GeoPoint, PointsAwarded,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ExperienceRow;
use super::pool::{DbPool, PoolError};
use super::schema::{experience_uids, experiences, registrations};

/// Diesel-backed implementation of the experience repository port.
#[derive(Clone)]
pub struct DieselExperienceRepository {
    pool: DbPool,
}

impl DieselExperienceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ExperienceRepositoryError {
    map_basic_pool_error(error, |message| {
        ExperienceRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: diesel::result::Error) -> ExperienceRepositoryError {
    map_basic_diesel_error(
        error,
        ExperienceRepositoryError::query,
        ExperienceRepositoryError::connection,
    )
}

/// Convert a database row into a validated domain experience.
fn row_to_experience(row: ExperienceRow) -> Result<Experience, ExperienceRepositoryError> {
    let ExperienceRow {
        id,
        title,
        description,
        category,
        cover_image_url,
        address,
        latitude,
        longitude,
        points_awarded,
        visible,
    } = row;

    let category = category.parse::<ExperienceCategory>().map_err(|err| {
        ExperienceRepositoryError::query(format!("experience {id}: {err}"))
    })?;
    let location = match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng).map_err(|err| {
            ExperienceRepositoryError::query(format!("experience {id}: {err}"))
        })?),
        _ => None,
    };

    Experience::new(ExperienceDraft {
        id: ExperienceId::from_uuid(id),
        title,
        description,
        category,
        cover_image_url,
        address,
        location,
        points_awarded: PointsAwarded::from_configured(points_awarded.map(i64::from)),
        visible,
    })
    .map_err(|err| ExperienceRepositoryError::query(format!("experience {id}: {err}")))
}

fn points_column(points: PointsAwarded) -> Result<i32, ExperienceRepositoryError> {
    i32::try_from(points.value())
        .map_err(|_| ExperienceRepositoryError::query("points exceed supported range"))
}

#[async_trait]
impl ExperienceRepository for DieselExperienceRepository {
    async fn find_by_id(
        &self,
        id: ExperienceId,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = experiences::table
            .find(id.as_uuid())
            .select(ExperienceRow::as_select())
            .first::<ExperienceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_experience).transpose()
    }

    async fn update_points(
        &self,
        id: ExperienceId,
        points: PointsAwarded,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        let points = points_column(points)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(experiences::table.find(id.as_uuid()))
            .set(experiences::points_awarded.eq(Some(points)))
            .returning(ExperienceRow::as_returning())
            .get_result::<ExperienceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_experience).transpose()
    }

    async fn set_visibility(
        &self,
        id: ExperienceId,
        visible: bool,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(experiences::table.find(id.as_uuid()))
            .set(experiences::visible.eq(visible))
            .returning(ExperienceRow::as_returning())
            .get_result::<ExperienceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_experience).transpose()
    }

    async fn delete_cascade(
        &self,
        id: ExperienceId,
    ) -> Result<Option<CascadeSummary>, ExperienceRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let experience_id: Uuid = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                let removed = diesel::delete(
                    registrations::table.filter(registrations::experience_id.eq(experience_id)),
                )
                .execute(conn)
                .await?;
                let uids = diesel::delete(
                    experience_uids::table.filter(experience_uids::experience_id.eq(experience_id)),
                )
                .execute(conn)
                .await?;
                let experiences_removed = diesel::delete(experiences::table.find(experience_id))
                    .execute(conn)
                    .await?;

                if experiences_removed == 0 {
                    return Ok(None);
                }

                Ok(Some(CascadeSummary {
                    uids_removed: uids as u64,
                    registrations_removed: removed as u64,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
