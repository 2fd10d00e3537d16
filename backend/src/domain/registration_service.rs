//! Registration engine.
//!
//! Registers the experience behind a scanned token for a user and credits
//! its points exactly once. Attempts by the same user are serialised through
//! [`UserLocks`]; the repository's unit of work and uniqueness constraint back
//! this up across processes.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ExperienceRepository, ExperienceRepositoryError, RegisterRequest, RegistrationCommand,
    RegistrationRepository, RegistrationRepositoryError, UidConsumption, UidRegistry,
    UidRegistryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Error, Experience, ExperienceId, Opinion, Registration, RegistrationDraft, RegistrationError,
    RegistrationId, RegistrationReceipt, ScanToken, UserId, UserLocks,
};

fn map_user_error(error: UserRepositoryError) -> RegistrationError {
    match error {
        UserRepositoryError::Connection { message } => RegistrationError::Unavailable { message },
        UserRepositoryError::Query { message } => RegistrationError::Internal { message },
    }
}

fn map_uid_error(error: UidRegistryError) -> RegistrationError {
    match error {
        UidRegistryError::Connection { message } => RegistrationError::Unavailable { message },
        UidRegistryError::Query { message } => RegistrationError::Internal { message },
    }
}

fn map_experience_error(error: ExperienceRepositoryError) -> RegistrationError {
    match error {
        ExperienceRepositoryError::Connection { message } => {
            RegistrationError::Unavailable { message }
        }
        ExperienceRepositoryError::Query { message } => RegistrationError::Internal { message },
    }
}

fn map_registration_error(
    error: RegistrationRepositoryError,
    user_id: &UserId,
    experience_id: ExperienceId,
) -> RegistrationError {
    match error {
        RegistrationRepositoryError::Duplicate => {
            warn!(
                user_id = %user_id,
                experience_id = %experience_id,
                "store rejected duplicate registration"
            );
            RegistrationError::AlreadyRegistered { experience_id }
        }
        RegistrationRepositoryError::LockTimeout => {
            warn!(user_id = %user_id, "store lock timeout while recording registration");
            RegistrationError::LockTimeout
        }
        RegistrationRepositoryError::UserMissing => RegistrationError::UserNotFound {
            user_id: user_id.clone(),
        },
        RegistrationRepositoryError::UidInactive => RegistrationError::InvalidOrInactiveToken,
        RegistrationRepositoryError::BalanceOverflow => {
            warn!(user_id = %user_id, "registration refused: balance would overflow");
            RegistrationError::BalanceOverflow {
                user_id: user_id.clone(),
            }
        }
        RegistrationRepositoryError::Connection { message } => {
            RegistrationError::Unavailable { message }
        }
        RegistrationRepositoryError::Query { message } => RegistrationError::Internal { message },
    }
}

/// Collaborators of [`RegistrationService`].
pub struct RegistrationStores<U, X, G, R> {
    pub users: Arc<U>,
    pub experiences: Arc<X>,
    pub uids: Arc<G>,
    pub registrations: Arc<R>,
}

impl<U, X, G, R> Clone for RegistrationStores<U, X, G, R> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            experiences: Arc::clone(&self.experiences),
            uids: Arc::clone(&self.uids),
            registrations: Arc::clone(&self.registrations),
        }
    }
}

/// Service implementing [`RegistrationCommand`].
pub struct RegistrationService<U, X, G, R> {
    stores: RegistrationStores<U, X, G, R>,
    locks: UserLocks,
    clock: Arc<dyn Clock>,
    consumption: UidConsumption,
}

impl<U, X, G, R> RegistrationService<U, X, G, R> {
    /// Create a service with default locking and UID reuse.
    pub fn new(stores: RegistrationStores<U, X, G, R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            stores,
            locks: UserLocks::default(),
            clock,
            consumption: UidConsumption::Keep,
        }
    }

    /// Use a specific lock registry (and therefore wait bound).
    #[must_use]
    pub fn with_locks(mut self, locks: UserLocks) -> Self {
        self.locks = locks;
        self
    }

    /// Choose whether a scanned UID is deactivated on use.
    #[must_use]
    pub fn with_consumption(mut self, consumption: UidConsumption) -> Self {
        self.consumption = consumption;
        self
    }
}

impl<U, X, G, R> RegistrationService<U, X, G, R>
where
    U: UserRepository,
    X: ExperienceRepository,
    G: UidRegistry,
    R: RegistrationRepository,
{
    async fn register_exclusive(
        &self,
        user_id: &UserId,
        token: &ScanToken,
        opinion: Option<Opinion>,
    ) -> Result<(Registration, Experience, u32), RegistrationError> {
        let _guard = self.locks.acquire(user_id).await.map_err(|err| {
            warn!(user_id = %user_id, waited = ?err.waited, "registration lock timeout");
            RegistrationError::LockTimeout
        })?;

        let user = self
            .stores
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| RegistrationError::UserNotFound {
                user_id: user_id.clone(),
            })?;

        let uid = self
            .stores
            .uids
            .resolve_active_token(token)
            .await
            .map_err(map_uid_error)?
            .ok_or(RegistrationError::InvalidOrInactiveToken)?;

        let experience_id = uid.experience_id();
        let experience = self
            .stores
            .experiences
            .find_by_id(experience_id)
            .await
            .map_err(map_experience_error)?
            .ok_or(RegistrationError::ExperienceNotFound { experience_id })?;

        let already = self
            .stores
            .registrations
            .exists_for(user.id(), experience_id)
            .await
            .map_err(|err| map_registration_error(err, user.id(), experience_id))?;
        if already {
            return Err(RegistrationError::AlreadyRegistered { experience_id });
        }

        let registration = Registration::new(RegistrationDraft {
            id: RegistrationId::random(),
            user_id: user.id().clone(),
            experience_id,
            experience_uid_id: uid.id(),
            opinion,
            cover_image_url: experience.cover_image_url().map(str::to_owned),
            points_awarded: experience.points_awarded(),
            registered_at: self.clock.utc(),
        });

        let balance = self
            .stores
            .registrations
            .record(&registration, self.consumption)
            .await
            .map_err(|err| map_registration_error(err, user.id(), experience_id))?;

        Ok((registration, experience, balance))
    }
}

#[async_trait]
impl<U, X, G, R> RegistrationCommand for RegistrationService<U, X, G, R>
where
    U: UserRepository,
    X: ExperienceRepository,
    G: UidRegistry,
    R: RegistrationRepository,
{
    async fn register(&self, request: RegisterRequest) -> Result<RegistrationReceipt, Error> {
        let RegisterRequest {
            user_id,
            token,
            opinion,
        } = request;

        let opinion = Opinion::parse(opinion.as_deref()).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({
                "field": "opinion",
                "code": "opinion_too_long",
            }))
        })?;

        match self.register_exclusive(&user_id, &token, opinion).await {
            Ok((registration, experience, balance)) => {
                info!(
                    user_id = %user_id,
                    experience_id = %experience.id(),
                    points_awarded = registration.points_awarded().value(),
                    balance,
                    "experience registered"
                );
                Ok(RegistrationReceipt::from_parts(&registration, &experience))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
#[path = "registration_service_tests.rs"]
mod tests;
