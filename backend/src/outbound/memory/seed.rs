//! JSON seed for the in-memory store.
//!
//! Lets a database-less run start with accounts, experiences and scan
//! tokens. The file is read once at startup:
//!
//! ```json
//! {
//!   "users": [
//!     { "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
//!       "displayName": "Ada", "email": "ada@example.org", "role": "ADMIN" }
//!   ],
//!   "experiences": [
//!     { "id": "9b2d7c1e-0f4a-4c55-8d1e-6a7b8c9d0e1f", "title": "Museo Numantino",
//!       "category": "MUSEO", "points": 25, "uids": ["0x4DFE12AB"] }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    DisplayName, Email, Experience, ExperienceCategory, ExperienceDraft, ExperienceId,
    ExperienceUid, ExperienceUidDraft, ExperienceUidId, PointsAwarded, ScanToken, User,
    UserDraft, UserId, UserRole,
};

use super::InMemoryPassportStore;

/// Errors raised while loading or applying a seed.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid seed entry {entry}: {message}")]
    Invalid { entry: String, message: String },
}

impl SeedError {
    fn invalid(entry: impl ToString, message: impl ToString) -> Self {
        Self::Invalid {
            entry: entry.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedUser {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SeedExperience {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    /// Configured award; missing or non-positive means the default of 10.
    #[serde(default)]
    pub points: Option<i64>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub uids: Vec<String>,
}

const fn visible_by_default() -> bool {
    true
}

/// Parsed seed document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MemorySeed {
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub experiences: Vec<SeedExperience>,
}

/// Counts of rows a seed inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub experiences: usize,
    pub uids: usize,
}

impl MemorySeed {
    /// Read and parse a seed file.
    ///
    /// # Errors
    /// [`SeedError::Read`] or [`SeedError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn users(&self) -> Result<Vec<User>, SeedError> {
        self.users
            .iter()
            .map(|seed| {
                let role = match seed.role.as_deref() {
                    Some(raw) => raw
                        .parse::<UserRole>()
                        .map_err(|err| SeedError::invalid(seed.id, err))?,
                    None => UserRole::User,
                };
                Ok(User::new(UserDraft {
                    id: UserId::from_uuid(seed.id),
                    display_name: DisplayName::new(seed.display_name.as_str())
                        .map_err(|err| SeedError::invalid(seed.id, err))?,
                    email: Email::new(&seed.email).map_err(|err| SeedError::invalid(seed.id, err))?,
                    role,
                    points: seed.points,
                    active: true,
                    created_at: Utc::now(),
                }))
            })
            .collect()
    }

    fn experiences(&self) -> Result<Vec<(Experience, Vec<ExperienceUid>)>, SeedError> {
        let mut tokens = HashSet::new();
        self.experiences
            .iter()
            .map(|seed| {
                let category = seed
                    .category
                    .parse::<ExperienceCategory>()
                    .map_err(|err| SeedError::invalid(seed.id, err))?;
                let experience = Experience::new(ExperienceDraft {
                    id: ExperienceId::from_uuid(seed.id),
                    title: seed.title.clone(),
                    description: seed.description.clone(),
                    category,
                    cover_image_url: seed.cover_image_url.clone(),
                    address: None,
                    location: None,
                    points_awarded: PointsAwarded::from_configured(seed.points),
                    visible: seed.visible,
                })
                .map_err(|err| SeedError::invalid(seed.id, err))?;

                let uids = seed
                    .uids
                    .iter()
                    .map(|raw| {
                        let token =
                            ScanToken::new(raw).map_err(|err| SeedError::invalid(seed.id, err))?;
                        if !tokens.insert(token.clone()) {
                            return Err(SeedError::invalid(token, "token listed twice"));
                        }
                        Ok(ExperienceUid::new(ExperienceUidDraft {
                            id: ExperienceUidId::random(),
                            experience_id: experience.id(),
                            token,
                            active: true,
                            created_at: Utc::now(),
                        }))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((experience, uids))
            })
            .collect()
    }
}

impl InMemoryPassportStore {
    /// Validate the whole seed, then insert it.
    ///
    /// Nothing is inserted when any entry is invalid.
    ///
    /// # Errors
    /// [`SeedError::Invalid`] naming the first offending entry.
    pub fn apply_seed(&self, seed: &MemorySeed) -> Result<SeedSummary, SeedError> {
        let users = seed.users()?;
        let experiences = seed.experiences()?;

        let mut summary = SeedSummary {
            users: users.len(),
            experiences: experiences.len(),
            uids: 0,
        };
        for user in users {
            self.seed_user(user);
        }
        for (experience, uids) in experiences {
            self.seed_experience(experience);
            summary.uids += uids.len();
            for uid in uids {
                self.seed_uid(uid);
            }
        }
        Ok(summary)
    }
}
