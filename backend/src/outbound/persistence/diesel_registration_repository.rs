//! PostgreSQL-backed `RegistrationRepository` implementation using Diesel ORM.
//!
//! `record` runs as a single transaction:
//!
//! 1. `SET LOCAL lock_timeout` bounds every row-lock wait.
//! 2. The user row is locked with `SELECT ... FOR UPDATE`, serialising
//!    registrations of the same user across processes. Once the row exists
//!    this statement can only fail by exceeding `lock_timeout`, so any
//!    server-side error it raises is reported as a lock timeout whatever
//!    language the server writes its messages in. The locked balance is
//!    checked for room before anything is written.
//! 3. With [`UidConsumption::Deactivate`], the scanned UID is flipped to
//!    inactive only if it is still active.
//! 4. The registration row is inserted; the
//!    `registrations_user_experience_key` constraint rejects duplicates.
//! 5. The award is added to the user's balance.
//!
//! Any failure rolls the whole unit back.

use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{RegistrationRepository, RegistrationRepositoryError, UidConsumption};
use crate::domain::{
    DEFAULT_LOCK_TIMEOUT, ExperienceId, ExperienceUidId, Opinion, PointsAwarded, Registration,
    RegistrationDraft, RegistrationId, UserId,
};

use super::diesel_basic_error_mapping::{
    is_lock_timeout, is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewRegistrationRow, RegistrationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{experience_uids, registrations, users};

/// Diesel-backed implementation of the registration repository port.
#[derive(Clone)]
pub struct DieselRegistrationRepository {
    pool: DbPool,
    lock_timeout: Duration,
}

impl DieselRegistrationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Override how long the transaction waits for row locks.
    #[must_use]
    pub fn with_lock_timeout(mut self, lock_timeout: Duration) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }
}

/// Failures raised inside the registration transaction.
#[derive(Debug)]
enum RecordError {
    UserMissing,
    UidInactive,
    LockTimeout,
    BalanceOverflow,
    Diesel(DieselError),
}

impl From<DieselError> for RecordError {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

/// Classify a failure of the `FOR UPDATE` row lock.
fn row_lock_error(error: DieselError) -> RecordError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::Unknown, info) => {
            debug!(message = info.message(), "user row lock not granted");
            RecordError::LockTimeout
        }
        other => RecordError::Diesel(other),
    }
}

fn map_pool_error(error: PoolError) -> RegistrationRepositoryError {
    map_basic_pool_error(error, |message| {
        RegistrationRepositoryError::connection(message)
    })
}

fn map_diesel_error(error: DieselError) -> RegistrationRepositoryError {
    if is_unique_violation(&error) {
        debug!("registration insert hit the uniqueness constraint");
        return RegistrationRepositoryError::duplicate();
    }
    if is_lock_timeout(&error) {
        debug!("registration transaction exceeded lock_timeout");
        return RegistrationRepositoryError::lock_timeout();
    }
    map_basic_diesel_error(
        error,
        RegistrationRepositoryError::query,
        RegistrationRepositoryError::connection,
    )
}

fn map_record_error(error: RecordError) -> RegistrationRepositoryError {
    match error {
        RecordError::UserMissing => RegistrationRepositoryError::user_missing(),
        RecordError::UidInactive => RegistrationRepositoryError::uid_inactive(),
        RecordError::LockTimeout => RegistrationRepositoryError::lock_timeout(),
        RecordError::BalanceOverflow => RegistrationRepositoryError::balance_overflow(),
        RecordError::Diesel(inner) => map_diesel_error(inner),
    }
}

fn lock_timeout_statement(lock_timeout: Duration) -> String {
    // Zero disables the timeout in PostgreSQL; keep at least one millisecond.
    let millis = lock_timeout.as_millis().max(1);
    format!("SET LOCAL lock_timeout = '{millis}ms'")
}

fn row_to_registration(row: RegistrationRow) -> Result<Registration, RegistrationRepositoryError> {
    let RegistrationRow {
        id,
        user_id,
        experience_id,
        experience_uid_id,
        opinion,
        cover_image_url,
        points_awarded,
        registered_at,
    } = row;

    let corrupt = |field: &str| {
        RegistrationRepositoryError::query(format!("invalid {field} for registration {id}"))
    };
    let opinion = Opinion::parse(opinion.as_deref()).map_err(|_| corrupt("opinion"))?;
    let points_awarded = u32::try_from(points_awarded)
        .ok()
        .and_then(PointsAwarded::new)
        .ok_or_else(|| corrupt("points_awarded"))?;

    Ok(Registration::new(RegistrationDraft {
        id: RegistrationId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        experience_id: ExperienceId::from_uuid(experience_id),
        experience_uid_id: ExperienceUidId::from_uuid(experience_uid_id),
        opinion,
        cover_image_url,
        points_awarded,
        registered_at,
    }))
}

#[async_trait]
impl RegistrationRepository for DieselRegistrationRepository {
    async fn exists_for(
        &self,
        user_id: &UserId,
        experience_id: ExperienceId,
    ) -> Result<bool, RegistrationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(diesel::dsl::exists(
            registrations::table
                .filter(registrations::user_id.eq(user_id.as_uuid()))
                .filter(registrations::experience_id.eq(experience_id.as_uuid())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn record(
        &self,
        registration: &Registration,
        consumption: UidConsumption,
    ) -> Result<u32, RegistrationRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let award = i32::try_from(registration.points_awarded().value())
            .map_err(|_| RegistrationRepositoryError::query("points exceed supported range"))?;
        let user_id: Uuid = *registration.user_id().as_uuid();
        let uid_id: Uuid = *registration.experience_uid_id().as_uuid();
        let new_row = NewRegistrationRow {
            id: *registration.id().as_uuid(),
            user_id,
            experience_id: *registration.experience_id().as_uuid(),
            experience_uid_id: uid_id,
            opinion: registration.opinion().map(AsRef::as_ref),
            cover_image_url: registration.cover_image_url(),
            points_awarded: award,
            registered_at: registration.registered_at(),
        };
        let set_lock_timeout = lock_timeout_statement(self.lock_timeout);

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let balance = conn
            .transaction::<_, RecordError, _>(|conn| {
                async move {
                    diesel::sql_query(set_lock_timeout).execute(conn).await?;

                    let locked = users::table
                        .find(user_id)
                        .select(users::points)
                        .for_update()
                        .first::<i32>(conn)
                        .await
                        .optional()
                        .map_err(row_lock_error)?;
                    let Some(points) = locked else {
                        return Err(RecordError::UserMissing);
                    };
                    if points.checked_add(award).is_none() {
                        return Err(RecordError::BalanceOverflow);
                    }

                    if consumption == UidConsumption::Deactivate {
                        let flipped = diesel::update(
                            experience_uids::table
                                .filter(experience_uids::id.eq(uid_id))
                                .filter(experience_uids::active.eq(true)),
                        )
                        .set(experience_uids::active.eq(false))
                        .execute(conn)
                        .await?;
                        if flipped == 0 {
                            return Err(RecordError::UidInactive);
                        }
                    }

                    diesel::insert_into(registrations::table)
                        .values(&new_row)
                        .execute(conn)
                        .await?;

                    let balance = diesel::update(users::table.find(user_id))
                        .set(users::points.eq(users::points + award))
                        .returning(users::points)
                        .get_result::<i32>(conn)
                        .await?;
                    Ok(balance)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_record_error)?;

        u32::try_from(balance)
            .map_err(|_| RegistrationRepositoryError::query("balance out of range after credit"))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Registration>, RegistrationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<RegistrationRow> = registrations::table
            .filter(registrations::user_id.eq(user_id.as_uuid()))
            .order((registrations::registered_at.desc(), registrations::id.desc()))
            .select(RegistrationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_registration).collect()
    }
}
