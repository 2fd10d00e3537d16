//! Experience and scan-token handlers.
//!
//! ```text
//! GET    /api/v1/experiences/by-uid/{uid}
//! GET    /api/v1/experiences/{id}/uids
//! PUT    /api/v1/experience-uids/{id}/active   {"active":false}
//! PUT    /api/v1/experiences/{id}/points       {"points":25}
//! PUT    /api/v1/experiences/{id}/visibility   {"visible":false}
//! DELETE /api/v1/experiences/{id}
//! ```
//!
//! Token resolution is public so the scanning client can preview an
//! experience before login. The administrative routes only require a
//! session; role checks belong to the account subsystem.

use actix_web::{delete, get, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::ports::{CascadeSummary, ExperienceDetail, ExperienceUidPayload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CascadeSummarySchema, ErrorSchema, ExperienceDetailSchema, ExperienceUidSchema,
};
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_experience_id, parse_experience_uid_id,
    parse_scan_token,
};

const EXPERIENCE_ID: FieldName = FieldName::new("experienceId");
const UID_ID: FieldName = FieldName::new("uidId");

/// Body for `PUT /api/v1/experience-uids/{id}/active`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ActiveBody {
    pub active: Option<bool>,
}

/// Body for `PUT /api/v1/experiences/{id}/points`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct PointsBody {
    /// New award; zero or negative restores the default of 10. Values above
    /// 2147483647 are rejected.
    #[schema(example = 25)]
    pub points: Option<i64>,
}

/// Body for `PUT /api/v1/experiences/{id}/visibility`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct VisibilityBody {
    pub visible: Option<bool>,
}

/// Experience detail behind an active scan token.
#[utoipa::path(
    get,
    path = "/api/v1/experiences/by-uid/{uid}",
    params(("uid" = String, Path, description = "Scanned token")),
    responses(
        (status = 200, description = "Experience", body = ExperienceDetailSchema),
        (status = 400, description = "Blank token", body = ErrorSchema),
        (status = 404, description = "Unknown or inactive token", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "resolveExperienceByUid",
    security([])
)]
#[get("/experiences/by-uid/{uid}")]
pub async fn resolve_by_uid(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ExperienceDetail>> {
    let token = parse_scan_token(Some(path.as_str()), FieldName::new("uid"))?;
    let detail = state.uids.resolve_experience(&token).await?;
    Ok(web::Json(detail))
}

/// UIDs of an experience, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/experiences/{id}/uids",
    params(("id" = String, Path, description = "Experience id")),
    responses(
        (status = 200, description = "UIDs", body = [ExperienceUidSchema]),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Experience not found", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "listExperienceUids"
)]
#[get("/experiences/{id}/uids")]
pub async fn list_uids(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ExperienceUidPayload>>> {
    let experience_id = parse_experience_id(&path, EXPERIENCE_ID)?;
    let uids = state.uids.list_for_experience(experience_id).await?;
    Ok(web::Json(uids))
}

/// Activate or deactivate a scan token.
#[utoipa::path(
    put,
    path = "/api/v1/experience-uids/{id}/active",
    params(("id" = String, Path, description = "UID row id")),
    request_body = ActiveBody,
    responses(
        (status = 200, description = "Updated UID", body = ExperienceUidSchema),
        (status = 400, description = "Malformed request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "UID not found", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "setExperienceUidActive"
)]
#[put("/experience-uids/{id}/active")]
pub async fn set_uid_active(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<ActiveBody>,
) -> ApiResult<web::Json<ExperienceUidPayload>> {
    let uid_id = parse_experience_uid_id(&path, UID_ID)?;
    let active = payload
        .active
        .ok_or_else(|| missing_field_error(FieldName::new("active")))?;
    let updated = state.uids_command.set_active(uid_id, active).await?;
    info!(admin = %user.0, %uid_id, active, "experience uid toggled");
    Ok(web::Json(updated))
}

/// Change the points an experience awards to future registrations.
#[utoipa::path(
    put,
    path = "/api/v1/experiences/{id}/points",
    params(("id" = String, Path, description = "Experience id")),
    request_body = PointsBody,
    responses(
        (status = 200, description = "Updated experience", body = ExperienceDetailSchema),
        (status = 400, description = "Malformed request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Experience not found", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "updateExperiencePoints"
)]
#[put("/experiences/{id}/points")]
pub async fn update_points(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<PointsBody>,
) -> ApiResult<web::Json<ExperienceDetail>> {
    let experience_id = parse_experience_id(&path, EXPERIENCE_ID)?;
    let points = payload
        .points
        .ok_or_else(|| missing_field_error(FieldName::new("points")))?;
    let detail = state
        .experiences_admin
        .update_points(experience_id, points)
        .await?;
    info!(admin = %user.0, %experience_id, points = detail.points_awarded, "experience points updated");
    Ok(web::Json(detail))
}

/// Show or hide an experience in listings.
#[utoipa::path(
    put,
    path = "/api/v1/experiences/{id}/visibility",
    params(("id" = String, Path, description = "Experience id")),
    request_body = VisibilityBody,
    responses(
        (status = 200, description = "Updated experience", body = ExperienceDetailSchema),
        (status = 400, description = "Malformed request", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Experience not found", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "setExperienceVisibility"
)]
#[put("/experiences/{id}/visibility")]
pub async fn set_visibility(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<VisibilityBody>,
) -> ApiResult<web::Json<ExperienceDetail>> {
    let experience_id = parse_experience_id(&path, EXPERIENCE_ID)?;
    let visible = payload
        .visible
        .ok_or_else(|| missing_field_error(FieldName::new("visible")))?;
    let detail = state
        .experiences_admin
        .set_visibility(experience_id, visible)
        .await?;
    Ok(web::Json(detail))
}

/// Delete an experience together with its UIDs and registrations.
#[utoipa::path(
    delete,
    path = "/api/v1/experiences/{id}",
    params(("id" = String, Path, description = "Experience id")),
    responses(
        (status = 200, description = "Rows removed", body = CascadeSummarySchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Experience not found", body = ErrorSchema)
    ),
    tags = ["experiences"],
    operation_id = "deleteExperience"
)]
#[delete("/experiences/{id}")]
pub async fn delete_experience(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<CascadeSummary>> {
    let experience_id = parse_experience_id(&path, EXPERIENCE_ID)?;
    let summary = state.experiences_admin.delete_cascade(experience_id).await?;
    info!(
        admin = %user.0,
        %experience_id,
        uids_removed = summary.uids_removed,
        registrations_removed = summary.registrations_removed,
        "experience deleted"
    );
    Ok(web::Json(summary))
}

#[cfg(test)]
#[path = "experiences_tests.rs"]
mod tests;
