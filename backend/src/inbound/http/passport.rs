//! Passport API handlers.
//!
//! ```text
//! POST /api/v1/passport/registrations {"uid":"0x4DFE12AB","opinion":"Great tapas"}
//! GET  /api/v1/passport
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{Passport, RegisterRequest};
use crate::domain::RegistrationReceipt;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PassportSchema, RegistrationReceiptSchema};
use crate::inbound::http::session::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_scan_token};

/// Request body for `POST /api/v1/passport/registrations`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    /// Scanned token, matched verbatim after trimming.
    #[schema(example = "0x4DFE12AB")]
    pub uid: Option<String>,
    /// Optional review, at most 1000 characters after trimming.
    #[schema(example = "Great tapas")]
    pub opinion: Option<String>,
}

/// Register the experience behind a scanned token in the caller's passport.
#[utoipa::path(
    post,
    path = "/api/v1/passport/registrations",
    request_body = RegisterBody,
    responses(
        (status = 200, description = "Experience registered", body = RegistrationReceiptSchema),
        (status = 400, description = "Missing token or invalid opinion", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "Unknown or inactive token", body = ErrorSchema),
        (status = 409, description = "Already registered", body = ErrorSchema),
        (status = 503, description = "Lock timeout or store unavailable; retry", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["passport"],
    operation_id = "registerExperience"
)]
#[post("/passport/registrations")]
pub async fn register(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<RegisterBody>,
) -> ApiResult<web::Json<RegistrationReceipt>> {
    let RegisterBody { uid, opinion } = payload.into_inner();
    let token = parse_scan_token(uid.as_deref(), FieldName::new("uid"))?;
    let receipt = state
        .registration
        .register(RegisterRequest {
            user_id: user.into_inner(),
            token,
            opinion,
        })
        .await?;
    Ok(web::Json(receipt))
}

/// The caller's running total and registrations, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/passport",
    responses(
        (status = 200, description = "Passport", body = PassportSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["passport"],
    operation_id = "getPassport"
)]
#[get("/passport")]
pub async fn passport(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Passport>> {
    let passport = state.passport.passport(&user.into_inner()).await?;
    Ok(web::Json(passport))
}

#[cfg(test)]
#[path = "passport_tests.rs"]
mod tests;
