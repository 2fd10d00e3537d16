//! Port for the scan-token registry.

use async_trait::async_trait;

use crate::domain::{ExperienceId, ExperienceUid, ExperienceUidId, ScanToken};

use super::define_port_error;

define_port_error! {
    /// Errors raised by UID registry adapters.
    pub enum UidRegistryError {
        /// Repository connection could not be established.
        Connection { message: String } => "uid registry connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "uid registry query failed: {message}",
    }
}

/// Lookup and activation of experience scan tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UidRegistry: Send + Sync {
    /// Resolve a token among active rows only. Unknown and inactive tokens
    /// both yield `None`.
    async fn resolve_active_token(
        &self,
        token: &ScanToken,
    ) -> Result<Option<ExperienceUid>, UidRegistryError>;

    /// All UIDs of an experience ordered by creation time, then id.
    async fn list_for_experience(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Vec<ExperienceUid>, UidRegistryError>;

    /// Flip a UID's activation flag. Returns `None` when it does not exist.
    async fn set_active(
        &self,
        uid_id: ExperienceUidId,
        active: bool,
    ) -> Result<Option<ExperienceUid>, UidRegistryError>;
}

/// Fixture registry with no tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUidRegistry;

#[async_trait]
impl UidRegistry for FixtureUidRegistry {
    async fn resolve_active_token(
        &self,
        _token: &ScanToken,
    ) -> Result<Option<ExperienceUid>, UidRegistryError> {
        Ok(None)
    }

    async fn list_for_experience(
        &self,
        _experience_id: ExperienceId,
    ) -> Result<Vec<ExperienceUid>, UidRegistryError> {
        Ok(Vec::new())
    }

    async fn set_active(
        &self,
        _uid_id: ExperienceUidId,
        _active: bool,
    ) -> Result<Option<ExperienceUid>, UidRegistryError> {
        Ok(None)
    }
}
