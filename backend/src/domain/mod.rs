//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define strongly typed passport entities and the services that
//! register experiences, read the points ledger, and administer the
//! experience catalogue. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Experience, ExperienceUid, Registration: passport entities.
//! - RegistrationError: classified registration failures.
//! - UserLocks: per-user exclusive sections.
//! - RegistrationService, PassportService, RankingService,
//!   UidRegistryService, ExperienceAdminService: driving port
//!   implementations.

pub mod error;
pub mod experience;
pub mod experience_admin_service;
pub mod experience_uid;
pub mod ids;
pub mod passport_service;
pub mod ports;
pub mod ranking_service;
pub mod registration;
pub mod registration_service;
pub mod trace_id;
pub mod uid_registry_service;
pub mod user;
pub mod user_locks;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::experience::{
    Experience, ExperienceCategory, ExperienceDraft, ExperienceValidationError, GeoPoint,
    PointsAwarded, UnknownCategoryError,
};
pub use self::experience_admin_service::ExperienceAdminService;
pub use self::experience_uid::{EmptyScanTokenError, ExperienceUid, ExperienceUidDraft, ScanToken};
pub use self::ids::{ExperienceId, ExperienceUidId, RegistrationId};
pub use self::passport_service::PassportService;
pub use self::ranking_service::{
    DEFAULT_RANKING_LIMIT, MAX_RANKING_LIMIT, RankingService, clamp_ranking_limit,
};
pub use self::registration::{
    OPINION_MAX, Opinion, Registration, RegistrationDraft, RegistrationError,
    RegistrationReceipt, RegistrationValidationError,
};
pub use self::registration_service::{RegistrationService, RegistrationStores};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::uid_registry_service::UidRegistryService;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, Email, User, UserDraft, UserId, UserRole, UserValidationError,
};
pub use self::user_locks::{DEFAULT_LOCK_TIMEOUT, LockTimeoutError, UserLockGuard, UserLocks};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::conflict("already registered"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
