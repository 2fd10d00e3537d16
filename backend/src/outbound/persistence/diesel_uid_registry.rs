//! PostgreSQL-backed `UidRegistry` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UidRegistry, UidRegistryError};
use crate::domain::{
    ExperienceId, ExperienceUid, ExperienceUidDraft, ExperienceUidId, ScanToken,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ExperienceUidRow;
use super::pool::{DbPool, PoolError};
use super::schema::experience_uids;

/// Diesel-backed implementation of the UID registry port.
#[derive(Clone)]
pub struct DieselUidRegistry {
    pool: DbPool,
}

impl DieselUidRegistry {
    /// Create a new registry with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UidRegistryError {
    map_basic_pool_error(error, |message| UidRegistryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UidRegistryError {
    map_basic_diesel_error(error, UidRegistryError::query, UidRegistryError::connection)
}

fn row_to_uid(row: ExperienceUidRow) -> Result<ExperienceUid, UidRegistryError> {
    let ExperienceUidRow {
        id,
        experience_id,
        uid,
        active,
        created_at,
    } = row;
    let token = ScanToken::new(uid)
        .map_err(|err| UidRegistryError::query(format!("experience uid {id}: {err}")))?;

    Ok(ExperienceUid::new(ExperienceUidDraft {
        id: ExperienceUidId::from_uuid(id),
        experience_id: ExperienceId::from_uuid(experience_id),
        token,
        active,
        created_at,
    }))
}

#[async_trait]
impl UidRegistry for DieselUidRegistry {
    async fn resolve_active_token(
        &self,
        token: &ScanToken,
    ) -> Result<Option<ExperienceUid>, UidRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = experience_uids::table
            .filter(experience_uids::uid.eq(token.as_ref()))
            .filter(experience_uids::active.eq(true))
            .select(ExperienceUidRow::as_select())
            .first::<ExperienceUidRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_uid).transpose()
    }

    async fn list_for_experience(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Vec<ExperienceUid>, UidRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ExperienceUidRow> = experience_uids::table
            .filter(experience_uids::experience_id.eq(experience_id.as_uuid()))
            .order((experience_uids::created_at.asc(), experience_uids::id.asc()))
            .select(ExperienceUidRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_uid).collect()
    }

    async fn set_active(
        &self,
        uid_id: ExperienceUidId,
        active: bool,
    ) -> Result<Option<ExperienceUid>, UidRegistryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(experience_uids::table.find(uid_id.as_uuid()))
            .set(experience_uids::active.eq(active))
            .returning(ExperienceUidRow::as_returning())
            .get_result::<ExperienceUidRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_uid).transpose()
    }
}
