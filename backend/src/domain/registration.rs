//! Registration records and the registration failure taxonomy.
//!
//! A registration is the durable proof that a user claimed an experience
//! once. It snapshots the cover image and the points award so later edits to
//! the experience never rewrite history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, Experience, ExperienceCategory, ExperienceId, ExperienceUidId, PointsAwarded,
    RegistrationId, UserId,
};

/// Maximum opinion length, in characters.
pub const OPINION_MAX: usize = 1000;

/// Validation failures for registration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    #[error("opinion must be at most {max} characters")]
    OpinionTooLong { max: usize },
}

/// Free-text opinion attached to a registration.
///
/// # Examples
/// ```
/// use backend::domain::Opinion;
///
/// let opinion = Opinion::parse(Some("  Great tapas  ")).expect("valid");
/// assert_eq!(opinion.as_ref().map(AsRef::as_ref), Some("Great tapas"));
/// assert_eq!(Opinion::parse(Some("   ")), Ok(None));
/// assert_eq!(Opinion::parse(None), Ok(None));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Opinion(String);

impl Opinion {
    /// Trim the input; blank text means "no opinion".
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, RegistrationValidationError> {
        let Some(trimmed) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        if trimmed.chars().count() > OPINION_MAX {
            return Err(RegistrationValidationError::OpinionTooLong { max: OPINION_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for Opinion {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Opinion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Input bundle for [`Registration::new`].
#[derive(Debug, Clone)]
pub struct RegistrationDraft {
    pub id: RegistrationId,
    pub user_id: UserId,
    pub experience_id: ExperienceId,
    pub experience_uid_id: ExperienceUidId,
    pub opinion: Option<Opinion>,
    pub cover_image_url: Option<String>,
    pub points_awarded: PointsAwarded,
    pub registered_at: DateTime<Utc>,
}

/// Immutable record that a user registered an experience.
///
/// ## Invariants
/// - `(user_id, experience_id)` is unique across all registrations.
/// - `points_awarded` and `cover_image_url` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    id: RegistrationId,
    user_id: UserId,
    experience_id: ExperienceId,
    experience_uid_id: ExperienceUidId,
    opinion: Option<Opinion>,
    cover_image_url: Option<String>,
    points_awarded: PointsAwarded,
    registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(draft: RegistrationDraft) -> Self {
        let RegistrationDraft {
            id,
            user_id,
            experience_id,
            experience_uid_id,
            opinion,
            cover_image_url,
            points_awarded,
            registered_at,
        } = draft;
        Self {
            id,
            user_id,
            experience_id,
            experience_uid_id,
            opinion,
            cover_image_url,
            points_awarded,
            registered_at,
        }
    }

    pub fn id(&self) -> RegistrationId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn experience_id(&self) -> ExperienceId {
        self.experience_id
    }

    /// The specific UID that was scanned.
    pub fn experience_uid_id(&self) -> ExperienceUidId {
        self.experience_uid_id
    }

    pub fn opinion(&self) -> Option<&Opinion> {
        self.opinion.as_ref()
    }

    /// Cover image captured at registration time.
    pub fn cover_image_url(&self) -> Option<&str> {
        self.cover_image_url.as_deref()
    }

    /// Points credited at registration time.
    pub fn points_awarded(&self) -> PointsAwarded {
        self.points_awarded
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }
}

/// Result of a successful registration, also used for ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub experience_id: ExperienceId,
    pub title: String,
    pub category: ExperienceCategory,
    pub registered_at: DateTime<Utc>,
    pub opinion: Option<String>,
    pub cover_image_url: Option<String>,
    pub points_awarded: u32,
}

impl RegistrationReceipt {
    /// Combine the stored snapshot with the experience's current metadata.
    pub fn from_parts(registration: &Registration, experience: &Experience) -> Self {
        Self {
            experience_id: registration.experience_id(),
            title: experience.title().to_owned(),
            category: experience.category(),
            registered_at: registration.registered_at(),
            opinion: registration.opinion().map(|o| o.as_ref().to_owned()),
            cover_image_url: registration.cover_image_url().map(str::to_owned),
            points_awarded: registration.points_awarded().value(),
        }
    }
}

/// Classified registration failure.
///
/// Every variant maps onto a domain [`Error`] with a stable `reason` and a
/// `retryable` hint in its details.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("user {user_id} not found")]
    UserNotFound { user_id: UserId },
    #[error("experience {experience_id} not found")]
    ExperienceNotFound { experience_id: ExperienceId },
    #[error("scanned token is unknown or inactive")]
    InvalidOrInactiveToken,
    #[error("experience {experience_id} is already registered")]
    AlreadyRegistered { experience_id: ExperienceId },
    #[error("points balance of user {user_id} cannot absorb the award")]
    BalanceOverflow { user_id: UserId },
    #[error("timed out waiting for exclusive access to the user")]
    LockTimeout,
    #[error("registration store unavailable: {message}")]
    Unavailable { message: String },
    #[error("registration failed: {message}")]
    Internal { message: String },
}

impl RegistrationError {
    /// Stable machine-readable reason.
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::UserNotFound { .. } => "user_not_found",
            Self::ExperienceNotFound { .. } => "experience_not_found",
            Self::InvalidOrInactiveToken => "invalid_or_inactive_token",
            Self::AlreadyRegistered { .. } => "already_registered",
            Self::BalanceOverflow { .. } => "balance_overflow",
            Self::LockTimeout => "lock_timeout",
            Self::Unavailable { .. } => "store_unavailable",
            Self::Internal { .. } => "internal",
        }
    }

    /// Whether the caller may retry the same request unchanged.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::LockTimeout | Self::Unavailable { .. })
    }
}

impl From<RegistrationError> for Error {
    fn from(err: RegistrationError) -> Self {
        let details = json!({
            "reason": err.reason(),
            "retryable": err.is_retryable(),
        });
        let message = err.to_string();
        let error = match err {
            RegistrationError::UserNotFound { .. }
            | RegistrationError::ExperienceNotFound { .. }
            | RegistrationError::InvalidOrInactiveToken => Error::not_found(message),
            RegistrationError::AlreadyRegistered { .. }
            | RegistrationError::BalanceOverflow { .. } => Error::conflict(message),
            RegistrationError::LockTimeout | RegistrationError::Unavailable { .. } => {
                Error::service_unavailable(message)
            }
            RegistrationError::Internal { .. } => Error::internal(message),
        };
        error.with_details(details)
    }
}

#[cfg(test)]
#[path = "registration_tests.rs"]
mod tests;
