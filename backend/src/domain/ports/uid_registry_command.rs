//! Driving port for activating and deactivating UIDs.

use async_trait::async_trait;

use crate::domain::{Error, ExperienceUidId};

use super::ExperienceUidPayload;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UidRegistryCommand: Send + Sync {
    /// Set a UID's activation flag. `NotFound` when the UID is missing.
    async fn set_active(
        &self,
        uid_id: ExperienceUidId,
        active: bool,
    ) -> Result<ExperienceUidPayload, Error>;
}

/// Fixture command that knows no UIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUidRegistryCommand;

#[async_trait]
impl UidRegistryCommand for FixtureUidRegistryCommand {
    async fn set_active(
        &self,
        uid_id: ExperienceUidId,
        _active: bool,
    ) -> Result<ExperienceUidPayload, Error> {
        Err(Error::not_found(format!("experience uid {uid_id} not found")))
    }
}
