//! Experience catalogue entities.
//!
//! An experience is a real-world venue or activity that users can register in
//! their passport. It owns its scan UIDs and registrations; deleting it
//! cascades to both through an explicit repository operation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ExperienceId;

/// Closed set of experience categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExperienceCategory {
    Restaurante,
    AireLibre,
    Museo,
    Monumento,
}

impl ExperienceCategory {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Restaurante => "RESTAURANTE",
            Self::AireLibre => "AIRE_LIBRE",
            Self::Museo => "MUSEO",
            Self::Monumento => "MONUMENTO",
        }
    }
}

impl fmt::Display for ExperienceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored or submitted category is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown experience category: {0}")]
pub struct UnknownCategoryError(pub String);

impl FromStr for ExperienceCategory {
    type Err = UnknownCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RESTAURANTE" => Ok(Self::Restaurante),
            "AIRE_LIBRE" => Ok(Self::AireLibre),
            "MUSEO" => Ok(Self::Museo),
            "MONUMENTO" => Ok(Self::Monumento),
            other => Err(UnknownCategoryError(other.to_owned())),
        }
    }
}

/// Points credited for registering an experience.
///
/// Always positive. Missing or non-positive configured values resolve to
/// [`PointsAwarded::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointsAwarded(u32);

impl PointsAwarded {
    /// Award used when an experience has no usable configured value.
    pub const DEFAULT: Self = Self(10);

    /// Largest award the store can hold.
    pub const MAX: Self = Self(i32::MAX.unsigned_abs());

    /// Validate a strictly positive award.
    pub const fn new(points: u32) -> Option<Self> {
        if points == 0 { None } else { Some(Self(points)) }
    }

    /// Resolve a configured value, applying the default fallback.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::PointsAwarded;
    ///
    /// assert_eq!(PointsAwarded::from_configured(Some(25)).value(), 25);
    /// assert_eq!(PointsAwarded::from_configured(Some(0)), PointsAwarded::DEFAULT);
    /// assert_eq!(PointsAwarded::from_configured(Some(-3)), PointsAwarded::DEFAULT);
    /// assert_eq!(PointsAwarded::from_configured(None), PointsAwarded::DEFAULT);
    /// ```
    pub fn from_configured(points: Option<i64>) -> Self {
        points
            .and_then(|value| u32::try_from(value).ok())
            .and_then(Self::new)
            .unwrap_or(Self::DEFAULT)
    }

    /// Raw points value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Default for PointsAwarded {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PointsAwarded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for experience construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExperienceValidationError {
    #[error("experience title must not be empty")]
    EmptyTitle,
    #[error("latitude must be within [-90, 90]")]
    LatitudeOutOfRange,
    #[error("longitude must be within [-180, 180]")]
    LongitudeOutOfRange,
}

/// Geographic position of an experience.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Validate coordinate ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ExperienceValidationError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ExperienceValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(ExperienceValidationError::LongitudeOutOfRange);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Input bundle for [`Experience::new`].
#[derive(Debug, Clone)]
pub struct ExperienceDraft {
    pub id: ExperienceId,
    pub title: String,
    pub description: Option<String>,
    pub category: ExperienceCategory,
    pub cover_image_url: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub points_awarded: PointsAwarded,
    pub visible: bool,
}

/// A registerable venue or activity.
#[derive(Debug, Clone, PartialEq)]
pub struct Experience {
    id: ExperienceId,
    title: String,
    description: Option<String>,
    category: ExperienceCategory,
    cover_image_url: Option<String>,
    address: Option<String>,
    location: Option<GeoPoint>,
    points_awarded: PointsAwarded,
    visible: bool,
}

impl Experience {
    /// Validate and build an experience.
    pub fn new(draft: ExperienceDraft) -> Result<Self, ExperienceValidationError> {
        let ExperienceDraft {
            id,
            title,
            description,
            category,
            cover_image_url,
            address,
            location,
            points_awarded,
            visible,
        } = draft;

        if title.trim().is_empty() {
            return Err(ExperienceValidationError::EmptyTitle);
        }

        Ok(Self {
            id,
            title,
            description,
            category,
            cover_image_url,
            address,
            location,
            points_awarded,
            visible,
        })
    }

    pub fn id(&self) -> ExperienceId {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn category(&self) -> ExperienceCategory {
        self.category
    }

    pub fn cover_image_url(&self) -> Option<&str> {
        self.cover_image_url.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Currently configured award. Registrations snapshot this value.
    pub fn points_awarded(&self) -> PointsAwarded {
        self.points_awarded
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
