//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: passport registration, the points ledger, the ranking,
//!   experience and UID administration, and the health probes
//! - **Schemas**: wrappers from [`crate::inbound::http::schemas`] that
//!   describe domain types without coupling them to utoipa
//! - **Security**: the session cookie written by the account service
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::experiences::{ActiveBody, PointsBody, VisibilityBody};
use crate::inbound::http::passport::RegisterBody;
use crate::inbound::http::schemas::{
    CascadeSummarySchema, ErrorCodeSchema, ErrorSchema, ExperienceCategorySchema,
    ExperienceDetailSchema, ExperienceUidSchema, PassportSchema, RankingEntrySchema,
    RegistrationReceiptSchema, UserRoleSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by the account service at login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Passport backend API",
        description = "Scan-to-register passport, points ledger and experience administration.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::passport::register,
        crate::inbound::http::passport::passport,
        crate::inbound::http::ranking::ranking,
        crate::inbound::http::experiences::resolve_by_uid,
        crate::inbound::http::experiences::list_uids,
        crate::inbound::http::experiences::set_uid_active,
        crate::inbound::http::experiences::update_points,
        crate::inbound::http::experiences::set_visibility,
        crate::inbound::http::experiences::delete_experience,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ExperienceCategorySchema,
        UserRoleSchema,
        RegistrationReceiptSchema,
        PassportSchema,
        RankingEntrySchema,
        ExperienceDetailSchema,
        ExperienceUidSchema,
        CascadeSummarySchema,
        RegisterBody,
        ActiveBody,
        PointsBody,
        VisibilityBody,
    )),
    tags(
        (name = "passport", description = "Scan registration and the points ledger"),
        (name = "ranking", description = "Leaderboard over user points"),
        (name = "experiences", description = "Experience and scan token administration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
