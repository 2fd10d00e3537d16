//! Scan tokens bound to experiences.
//!
//! A token is an opaque string printed as a QR code. The registry never
//! parses, decodes, or reformats it: two tokens are equal exactly when their
//! strings are equal.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::{ExperienceId, ExperienceUidId};

/// Raised when a scanned token is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scan token must not be empty")]
pub struct EmptyScanTokenError;

/// Opaque scan token.
///
/// Surrounding whitespace (a common artefact of QR readers and copy/paste) is
/// trimmed; the remaining text is kept verbatim.
///
/// # Examples
/// ```
/// use backend::domain::ScanToken;
///
/// let token = ScanToken::new(" 0xABCDEF ").expect("non-empty");
/// assert_eq!(token.as_ref(), "0xABCDEF");
/// assert!(ScanToken::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanToken(String);

impl ScanToken {
    /// Validate non-emptiness and wrap the token.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyScanTokenError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmptyScanTokenError);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ScanToken {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ScanToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Input bundle for [`ExperienceUid::new`].
#[derive(Debug, Clone)]
pub struct ExperienceUidDraft {
    pub id: ExperienceUidId,
    pub experience_id: ExperienceId,
    pub token: ScanToken,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// A scan token row owned by exactly one experience for its lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceUid {
    id: ExperienceUidId,
    experience_id: ExperienceId,
    token: ScanToken,
    active: bool,
    created_at: DateTime<Utc>,
}

impl ExperienceUid {
    pub fn new(draft: ExperienceUidDraft) -> Self {
        let ExperienceUidDraft {
            id,
            experience_id,
            token,
            active,
            created_at,
        } = draft;
        Self {
            id,
            experience_id,
            token,
            active,
            created_at,
        }
    }

    pub fn id(&self) -> ExperienceUidId {
        self.id
    }

    /// Owning experience.
    pub fn experience_id(&self) -> ExperienceId {
        self.experience_id
    }

    pub fn token(&self) -> &ScanToken {
        &self.token
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Copy of this UID with a different activation flag.
    #[must_use]
    pub fn with_active(&self, active: bool) -> Self {
        Self {
            active,
            ..self.clone()
        }
    }
}
