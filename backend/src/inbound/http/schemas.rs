//! OpenAPI schema definitions for domain types.
//!
//! Domain types do not derive `ToSchema`. The wrappers below mirror their
//! serialized shape and register under the domain type's path via
//! `#[schema(as = ...)]`, keeping utoipa out of the domain layer.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No authenticated session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    /// Unknown resource, or an unknown or inactive scan token.
    #[schema(rename = "not_found")]
    NotFound,
    /// The experience is already in the user's passport.
    #[schema(rename = "conflict")]
    Conflict,
    /// Transient failure such as a lock timeout; safe to retry.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ErrorSchema {
    #[schema(example = "conflict")]
    code: ErrorCodeSchema,
    #[schema(example = "experience is already registered")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Machine-readable context such as `{"reason": "lock_timeout", "retryable": true}`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::ExperienceCategory`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ExperienceCategory)]
pub enum ExperienceCategorySchema {
    #[schema(rename = "RESTAURANTE")]
    Restaurante,
    #[schema(rename = "AIRE_LIBRE")]
    AireLibre,
    #[schema(rename = "MUSEO")]
    Museo,
    #[schema(rename = "MONUMENTO")]
    Monumento,
}

/// OpenAPI schema for [`crate::domain::UserRole`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserRole)]
pub enum UserRoleSchema {
    #[schema(rename = "USER")]
    User,
    #[schema(rename = "ADMIN")]
    Admin,
}

/// OpenAPI schema for [`crate::domain::RegistrationReceipt`].
#[derive(ToSchema)]
#[schema(as = crate::domain::RegistrationReceipt, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RegistrationReceiptSchema {
    #[schema(value_type = String, example = "8d4f1f2e-7c0b-4c55-9a51-0f0c3c1b2a10")]
    experience_id: String,
    #[schema(example = "Museo del Prado")]
    title: String,
    category: ExperienceCategorySchema,
    #[schema(value_type = String, example = "2026-01-15T10:30:00Z")]
    registered_at: String,
    #[schema(example = "Worth the queue")]
    opinion: Option<String>,
    cover_image_url: Option<String>,
    /// Award snapshotted when the registration was made.
    #[schema(example = 10)]
    points_awarded: u32,
}

/// OpenAPI schema for [`crate::domain::ports::Passport`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::Passport, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct PassportSchema {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    user_id: String,
    #[schema(example = "Ada Lovelace")]
    display_name: String,
    #[schema(example = 40)]
    total_points: u32,
    /// Newest first.
    registrations: Vec<RegistrationReceiptSchema>,
}

/// OpenAPI schema for [`crate::domain::ports::RankingEntry`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::RankingEntry, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct RankingEntrySchema {
    #[schema(example = "Ada Lovelace")]
    display_name: String,
    #[schema(example = 120)]
    points: u32,
    role: UserRoleSchema,
}

/// OpenAPI schema for [`crate::domain::ports::ExperienceDetail`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ExperienceDetail, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ExperienceDetailSchema {
    #[schema(value_type = String, example = "8d4f1f2e-7c0b-4c55-9a51-0f0c3c1b2a10")]
    id: String,
    title: String,
    description: Option<String>,
    category: ExperienceCategorySchema,
    cover_image_url: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[schema(example = 10)]
    points_awarded: u32,
    visible: bool,
}

/// OpenAPI schema for [`crate::domain::ports::ExperienceUidPayload`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::ExperienceUidPayload, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ExperienceUidSchema {
    #[schema(value_type = String)]
    id: String,
    #[schema(value_type = String)]
    experience_id: String,
    /// Opaque scan token, returned verbatim.
    #[schema(example = "0x4DFE12AB")]
    uid: String,
    active: bool,
    #[schema(value_type = String, example = "2026-01-15T10:30:00Z")]
    created_at: String,
}

/// OpenAPI schema for [`crate::domain::ports::CascadeSummary`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ports::CascadeSummary, rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CascadeSummarySchema {
    #[schema(example = 2)]
    uids_removed: u64,
    #[schema(example = 17)]
    registrations_removed: u64,
}
