//! Driving port for reading the UID registry.
//!
//! Also defines the serialisable experience and UID payloads shared by the
//! administrative ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Error, Experience, ExperienceCategory, ExperienceId, ExperienceUid, ExperienceUidId,
    ScanToken,
};

/// Serializable UID row for administrative display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceUidPayload {
    pub id: ExperienceUidId,
    pub experience_id: ExperienceId,
    pub uid: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ExperienceUid> for ExperienceUidPayload {
    fn from(value: ExperienceUid) -> Self {
        Self {
            id: value.id(),
            experience_id: value.experience_id(),
            uid: value.token().as_ref().to_owned(),
            active: value.is_active(),
            created_at: value.created_at(),
        }
    }
}

/// Serializable experience detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDetail {
    pub id: ExperienceId,
    pub title: String,
    pub description: Option<String>,
    pub category: ExperienceCategory,
    pub cover_image_url: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub points_awarded: u32,
    pub visible: bool,
}

impl From<&Experience> for ExperienceDetail {
    fn from(value: &Experience) -> Self {
        Self {
            id: value.id(),
            title: value.title().to_owned(),
            description: value.description().map(str::to_owned),
            category: value.category(),
            cover_image_url: value.cover_image_url().map(str::to_owned),
            address: value.address().map(str::to_owned),
            latitude: value.location().map(|point| point.latitude()),
            longitude: value.location().map(|point| point.longitude()),
            points_awarded: value.points_awarded().value(),
            visible: value.is_visible(),
        }
    }
}

/// Driving port for UID registry reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UidRegistryQuery: Send + Sync {
    /// UIDs of an experience ordered by creation time. `NotFound` when the
    /// experience does not exist.
    async fn list_for_experience(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Vec<ExperienceUidPayload>, Error>;

    /// Experience owning an active token. Unknown and inactive tokens fail
    /// identically.
    async fn resolve_experience(&self, token: &ScanToken) -> Result<ExperienceDetail, Error>;
}

/// Fixture query with an empty registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUidRegistryQuery;

#[async_trait]
impl UidRegistryQuery for FixtureUidRegistryQuery {
    async fn list_for_experience(
        &self,
        _experience_id: ExperienceId,
    ) -> Result<Vec<ExperienceUidPayload>, Error> {
        Ok(Vec::new())
    }

    async fn resolve_experience(&self, _token: &ScanToken) -> Result<ExperienceDetail, Error> {
        Err(crate::domain::RegistrationError::InvalidOrInactiveToken.into())
    }
}
