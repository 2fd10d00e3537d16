//! UID registry service implementing the registry driving ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    ExperienceDetail, ExperienceRepository, ExperienceRepositoryError, ExperienceUidPayload,
    UidRegistry, UidRegistryCommand, UidRegistryError, UidRegistryQuery,
};
use crate::domain::{Error, ExperienceId, ExperienceUidId, RegistrationError, ScanToken};

fn map_registry_error(error: UidRegistryError) -> Error {
    match error {
        UidRegistryError::Connection { message } => {
            Error::service_unavailable(format!("uid registry unavailable: {message}"))
        }
        UidRegistryError::Query { message } => {
            Error::internal(format!("uid registry error: {message}"))
        }
    }
}

fn map_experience_error(error: ExperienceRepositoryError) -> Error {
    match error {
        ExperienceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("experience repository unavailable: {message}"))
        }
        ExperienceRepositoryError::Query { message } => {
            Error::internal(format!("experience repository error: {message}"))
        }
    }
}

/// Service over the [`UidRegistry`] and the experience catalogue.
pub struct UidRegistryService<G, X> {
    uids: Arc<G>,
    experiences: Arc<X>,
}

impl<G, X> UidRegistryService<G, X> {
    pub fn new(uids: Arc<G>, experiences: Arc<X>) -> Self {
        Self { uids, experiences }
    }
}

#[async_trait]
impl<G, X> UidRegistryQuery for UidRegistryService<G, X>
where
    G: UidRegistry,
    X: ExperienceRepository,
{
    async fn list_for_experience(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Vec<ExperienceUidPayload>, Error> {
        self.experiences
            .find_by_id(experience_id)
            .await
            .map_err(map_experience_error)?
            .ok_or_else(|| Error::not_found(format!("experience {experience_id} not found")))?;

        let uids = self
            .uids
            .list_for_experience(experience_id)
            .await
            .map_err(map_registry_error)?;
        Ok(uids.into_iter().map(ExperienceUidPayload::from).collect())
    }

    async fn resolve_experience(&self, token: &ScanToken) -> Result<ExperienceDetail, Error> {
        let uid = self
            .uids
            .resolve_active_token(token)
            .await
            .map_err(map_registry_error)?
            .ok_or(RegistrationError::InvalidOrInactiveToken)?;

        let experience_id = uid.experience_id();
        let experience = self
            .experiences
            .find_by_id(experience_id)
            .await
            .map_err(map_experience_error)?
            .ok_or(RegistrationError::ExperienceNotFound { experience_id })?;

        Ok(ExperienceDetail::from(&experience))
    }
}

#[async_trait]
impl<G, X> UidRegistryCommand for UidRegistryService<G, X>
where
    G: UidRegistry,
    X: ExperienceRepository,
{
    async fn set_active(
        &self,
        uid_id: ExperienceUidId,
        active: bool,
    ) -> Result<ExperienceUidPayload, Error> {
        let updated = self
            .uids
            .set_active(uid_id, active)
            .await
            .map_err(map_registry_error)?
            .ok_or_else(|| Error::not_found(format!("experience uid {uid_id} not found")))?;

        info!(uid_id = %uid_id, active, "experience uid activation changed");
        Ok(ExperienceUidPayload::from(updated))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{MockExperienceRepository, MockUidRegistry};
    use crate::domain::{
        ErrorCode, Experience, ExperienceCategory, ExperienceDraft, ExperienceUid,
        ExperienceUidDraft, PointsAwarded,
    };

    #[fixture]
    fn experience() -> Experience {
        Experience::new(ExperienceDraft {
            id: ExperienceId::random(),
            title: "Museo del Prado".to_owned(),
            description: Some("Pinacoteca".to_owned()),
            category: ExperienceCategory::Museo,
            cover_image_url: None,
            address: Some("Paseo del Prado".to_owned()),
            location: None,
            points_awarded: PointsAwarded::DEFAULT,
            visible: true,
        })
        .expect("valid experience")
    }

    fn uid(experience_id: ExperienceId, token: &str, minute: u32) -> ExperienceUid {
        ExperienceUid::new(ExperienceUidDraft {
            id: ExperienceUidId::random(),
            experience_id,
            token: ScanToken::new(token).expect("token"),
            active: true,
            created_at: Utc
                .with_ymd_and_hms(2026, 1, 1, 10, minute, 0)
                .single()
                .expect("timestamp"),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn list_returns_payloads_in_registry_order(experience: Experience) {
        let id = experience.id();
        let mut experiences = MockExperienceRepository::new();
        experiences
            .expect_find_by_id()
            .with(eq(id))
            .return_once(move |_| Ok(Some(experience)));
        let mut uids = MockUidRegistry::new();
        let rows = vec![uid(id, "first", 1), uid(id, "second", 2)];
        uids.expect_list_for_experience()
            .with(eq(id))
            .return_once(move |_| Ok(rows));

        let service = UidRegistryService::new(Arc::new(uids), Arc::new(experiences));
        let listed = service.list_for_experience(id).await.expect("list");

        let tokens: Vec<_> = listed.iter().map(|row| row.uid.as_str()).collect();
        assert_eq!(tokens, ["first", "second"]);
    }

    #[rstest]
    #[tokio::test]
    async fn list_rejects_unknown_experience() {
        let mut experiences = MockExperienceRepository::new();
        experiences.expect_find_by_id().return_once(|_| Ok(None));
        let mut uids = MockUidRegistry::new();
        uids.expect_list_for_experience().times(0);

        let service = UidRegistryService::new(Arc::new(uids), Arc::new(experiences));
        let error = service
            .list_for_experience(ExperienceId::random())
            .await
            .expect_err("missing experience");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_returns_owning_experience(experience: Experience) {
        let id = experience.id();
        let row = uid(id, "prado-hall", 0);
        let mut uids = MockUidRegistry::new();
        uids.expect_resolve_active_token()
            .return_once(move |_| Ok(Some(row)));
        let mut experiences = MockExperienceRepository::new();
        experiences
            .expect_find_by_id()
            .return_once(move |_| Ok(Some(experience)));

        let service = UidRegistryService::new(Arc::new(uids), Arc::new(experiences));
        let detail = service
            .resolve_experience(&ScanToken::new("prado-hall").expect("token"))
            .await
            .expect("resolve");

        assert_eq!(detail.id, id);
        assert_eq!(detail.title, "Museo del Prado");
        assert_eq!(detail.points_awarded, 10);
    }

    #[rstest]
    #[tokio::test]
    async fn resolve_hides_inactive_tokens() {
        let mut uids = MockUidRegistry::new();
        uids.expect_resolve_active_token().return_once(|_| Ok(None));

        let service = UidRegistryService::new(
            Arc::new(uids),
            Arc::new(MockExperienceRepository::new()),
        );
        let error = service
            .resolve_experience(&ScanToken::new("retired").expect("token"))
            .await
            .expect_err("inactive");

        assert_eq!(error.code(), ErrorCode::NotFound);
        let details = error.details().expect("details");
        assert_eq!(details["reason"], "invalid_or_inactive_token");
    }

    #[rstest]
    #[tokio::test]
    async fn set_active_reports_missing_uid() {
        let mut uids = MockUidRegistry::new();
        uids.expect_set_active().return_once(|_, _| Ok(None));

        let service = UidRegistryService::new(
            Arc::new(uids),
            Arc::new(MockExperienceRepository::new()),
        );
        let error = service
            .set_active(ExperienceUidId::random(), false)
            .await
            .expect_err("missing uid");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn set_active_returns_updated_row(experience: Experience) {
        let row = uid(experience.id(), "gate", 3).with_active(false);
        let row_id = row.id();
        let mut uids = MockUidRegistry::new();
        uids.expect_set_active()
            .with(eq(row_id), eq(false))
            .return_once(move |_, _| Ok(Some(row)));

        let service = UidRegistryService::new(
            Arc::new(uids),
            Arc::new(MockExperienceRepository::new()),
        );
        let payload = service.set_active(row_id, false).await.expect("update");
        assert!(!payload.active);
        assert_eq!(payload.uid, "gate");
    }
}
