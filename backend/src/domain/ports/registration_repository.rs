//! Port for persisting registrations together with the points credit.

use async_trait::async_trait;

use crate::domain::{ExperienceId, Registration, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by registration repository adapters.
    pub enum RegistrationRepositoryError {
        /// A registration for the same user and experience already exists.
        Duplicate => "registration already exists for user and experience",
        /// The store gave up waiting for a row lock.
        LockTimeout => "timed out waiting for registration row lock",
        /// The user row vanished before it could be credited.
        UserMissing => "user row not found while crediting points",
        /// The scanned UID was consumed or deactivated concurrently.
        UidInactive => "scanned uid is no longer active",
        /// Crediting the award would overflow the stored balance.
        BalanceOverflow => "points balance cannot absorb the award",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "registration repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "registration repository query failed: {message}",
    }
}

/// What to do with the scanned UID when recording a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UidConsumption {
    /// Leave the UID active for other users.
    #[default]
    Keep,
    /// Deactivate the UID in the same unit of work.
    Deactivate,
}

/// Registration storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Whether the user already registered the experience.
    async fn exists_for(
        &self,
        user_id: &UserId,
        experience_id: ExperienceId,
    ) -> Result<bool, RegistrationRepositoryError>;

    /// Insert the registration and add its award to the user's balance
    /// atomically. Returns the new balance.
    ///
    /// Adapters must report a uniqueness violation as
    /// [`RegistrationRepositoryError::Duplicate`] and leave no partial state
    /// behind on any error.
    async fn record(
        &self,
        registration: &Registration,
        consumption: UidConsumption,
    ) -> Result<u32, RegistrationRepositoryError>;

    /// Registrations of a user, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Registration>, RegistrationRepositoryError>;
}

/// Fixture repository that accepts writes and stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationRepository;

#[async_trait]
impl RegistrationRepository for FixtureRegistrationRepository {
    async fn exists_for(
        &self,
        _user_id: &UserId,
        _experience_id: ExperienceId,
    ) -> Result<bool, RegistrationRepositoryError> {
        Ok(false)
    }

    async fn record(
        &self,
        registration: &Registration,
        _consumption: UidConsumption,
    ) -> Result<u32, RegistrationRepositoryError> {
        Ok(registration.points_awarded().value())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<Registration>, RegistrationRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{ExperienceUidId, PointsAwarded, RegistrationDraft, RegistrationId};

    #[rstest]
    #[tokio::test]
    async fn fixture_record_returns_award_as_balance() {
        let registration = Registration::new(RegistrationDraft {
            id: RegistrationId::random(),
            user_id: UserId::random(),
            experience_id: ExperienceId::random(),
            experience_uid_id: ExperienceUidId::random(),
            opinion: None,
            cover_image_url: None,
            points_awarded: PointsAwarded::DEFAULT,
            registered_at: Utc::now(),
        });
        let balance = FixtureRegistrationRepository
            .record(&registration, UidConsumption::Keep)
            .await
            .expect("fixture record");
        assert_eq!(balance, 10);
    }

    #[rstest]
    fn consumption_defaults_to_keep() {
        assert_eq!(UidConsumption::default(), UidConsumption::Keep);
    }
}
