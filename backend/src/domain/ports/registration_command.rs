//! Driving port for registering experiences in a user's passport.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{
    Error, ExperienceCategory, ExperienceId, RegistrationReceipt, ScanToken, UserId,
};

/// Request to register the experience behind a scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    pub user_id: UserId,
    pub token: ScanToken,
    /// Raw opinion text; trimmed and validated by the service.
    pub opinion: Option<String>,
}

/// Driving port for the registration engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Register the experience owning `request.token` for `request.user_id`
    /// and credit its points exactly once.
    async fn register(&self, request: RegisterRequest) -> Result<RegistrationReceipt, Error>;
}

/// Fixture command returning a fixed receipt.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRegistrationCommand;

fn fixture_registered_at() -> DateTime<Utc> {
    Utc.timestamp_opt(1_767_225_600, 0)
        .single()
        .unwrap_or_default()
}

#[async_trait]
impl RegistrationCommand for FixtureRegistrationCommand {
    async fn register(&self, request: RegisterRequest) -> Result<RegistrationReceipt, Error> {
        Ok(RegistrationReceipt {
            experience_id: ExperienceId::from_uuid(uuid::Uuid::nil()),
            title: "Fixture experience".to_owned(),
            category: ExperienceCategory::Monumento,
            registered_at: fixture_registered_at(),
            opinion: request
                .opinion
                .map(|text| text.trim().to_owned())
                .filter(|text| !text.is_empty()),
            cover_image_url: None,
            points_awarded: 10,
        })
    }
}
