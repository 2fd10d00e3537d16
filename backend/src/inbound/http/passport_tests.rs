//! Handler tests for the passport endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockPassportQuery, MockRegistrationCommand};
use crate::domain::{
    ExperienceCategory, ExperienceId, RegistrationError, ScanToken, UserId,
};
use crate::inbound::http::test_utils::{session_cookie_for, test_session_middleware};

const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn user_id() -> UserId {
    UserId::new(USER).expect("fixture id")
}

fn receipt(opinion: Option<&str>) -> RegistrationReceipt {
    RegistrationReceipt {
        experience_id: ExperienceId::from_uuid(uuid::Uuid::nil()),
        title: "Museo Numantino".to_owned(),
        category: ExperienceCategory::Museo,
        registered_at: Utc
            .with_ymd_and_hms(2026, 1, 15, 10, 30, 0)
            .single()
            .expect("valid timestamp"),
        opinion: opinion.map(str::to_owned),
        cover_image_url: None,
        points_awarded: 25,
    }
}

async fn call(state: HttpState, request: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").service(register).service(passport)),
    )
    .await;
    let res = test::call_service(&app, request.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

async fn register_request(body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/v1/passport/registrations")
        .cookie(session_cookie_for(USER).await)
        .set_json(body)
}

#[rstest]
#[actix_web::test]
async fn register_forwards_session_user_and_trimmed_token(user_id: UserId) {
    let mut command = MockRegistrationCommand::new();
    command
        .expect_register()
        .with(eq(RegisterRequest {
            user_id,
            token: ScanToken::new("0x4DFE12AB").expect("token"),
            opinion: Some("  lovely  ".to_owned()),
        }))
        .times(1)
        .return_once(|_| Ok(receipt(Some("lovely"))));
    let state = HttpState::fixtures().with_registration(Arc::new(command));

    let (status, body) = call(
        state,
        register_request(json!({"uid": " 0x4DFE12AB ", "opinion": "  lovely  "})).await,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Museo Numantino");
    assert_eq!(body["category"], "MUSEO");
    assert_eq!(body["pointsAwarded"], 25);
    assert_eq!(body["opinion"], "lovely");
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({"uid": "   "}), "blank_token")]
#[actix_web::test]
async fn register_rejects_unusable_tokens(#[case] payload: Value, #[case] code: &str) {
    let mut command = MockRegistrationCommand::new();
    command.expect_register().never();
    let state = HttpState::fixtures().with_registration(Arc::new(command));

    let (status, body) = call(state, register_request(payload).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "uid");
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn register_requires_a_session() {
    let (status, body) = call(
        HttpState::fixtures(),
        test::TestRequest::post()
            .uri("/api/v1/passport/registrations")
            .set_json(json!({"uid": "abc"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[case(
    RegistrationError::AlreadyRegistered { experience_id: ExperienceId::from_uuid(uuid::Uuid::nil()) },
    StatusCode::CONFLICT,
    "already_registered"
)]
#[case(RegistrationError::InvalidOrInactiveToken, StatusCode::NOT_FOUND, "invalid_or_inactive_token")]
#[case(RegistrationError::LockTimeout, StatusCode::SERVICE_UNAVAILABLE, "lock_timeout")]
#[actix_web::test]
async fn register_maps_registration_failures(
    #[case] failure: RegistrationError,
    #[case] status: StatusCode,
    #[case] reason: &str,
) {
    let mut command = MockRegistrationCommand::new();
    command
        .expect_register()
        .return_once(move |_| Err(failure.into()));
    let state = HttpState::fixtures().with_registration(Arc::new(command));

    let (actual, body) = call(state, register_request(json!({"uid": "abc"})).await).await;

    assert_eq!(actual, status);
    assert_eq!(body["details"]["reason"], reason);
}

#[rstest]
#[actix_web::test]
async fn passport_returns_the_session_users_ledger(user_id: UserId) {
    let mut query = MockPassportQuery::new();
    let expected_user = user_id.clone();
    query
        .expect_passport()
        .withf(move |id| *id == expected_user)
        .return_once(move |id| {
            Ok(Passport {
                user_id: id.clone(),
                display_name: "Ada".to_owned(),
                total_points: 25,
                registrations: vec![receipt(None)],
            })
        });
    let state = HttpState::fixtures().with_passport(Arc::new(query));

    let (status, body) = call(
        state,
        test::TestRequest::get()
            .uri("/api/v1/passport")
            .cookie(session_cookie_for(USER).await),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], USER);
    assert_eq!(body["totalPoints"], 25);
    assert_eq!(body["registrations"].as_array().map(Vec::len), Some(1));
}
