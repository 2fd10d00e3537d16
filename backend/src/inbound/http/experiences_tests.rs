//! Handler tests for experience and UID endpoints.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::ports::{
    FixtureUidRegistryCommand, MockExperienceAdminCommand, MockUidRegistryCommand,
    MockUidRegistryQuery,
};
use crate::domain::{ExperienceCategory, ExperienceId, ExperienceUidId, RegistrationError, ScanToken};
use crate::inbound::http::test_utils::{session_cookie_for, test_session_middleware};

const USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
const EXPERIENCE: &str = "8d4f1f2e-7c0b-4c55-9a51-0f0c3c1b2a10";

fn experience_id() -> ExperienceId {
    ExperienceId::from_uuid(Uuid::parse_str(EXPERIENCE).expect("uuid"))
}

fn detail(points: u32) -> ExperienceDetail {
    ExperienceDetail {
        id: experience_id(),
        title: "Laguna Negra".to_owned(),
        description: None,
        category: ExperienceCategory::AireLibre,
        cover_image_url: None,
        address: None,
        latitude: Some(41.99),
        longitude: Some(-2.85),
        points_awarded: points,
        visible: true,
    }
}

async fn call(state: HttpState, request: test::TestRequest) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .wrap(test_session_middleware())
            .app_data(web::Data::new(state))
            .service(
                web::scope("/api/v1")
                    .service(resolve_by_uid)
                    .service(list_uids)
                    .service(set_uid_active)
                    .service(update_points)
                    .service(set_visibility)
                    .service(delete_experience),
            ),
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

#[rstest]
#[actix_web::test]
async fn resolve_by_uid_is_public_and_decodes_the_path() {
    let mut query = MockUidRegistryQuery::new();
    query
        .expect_resolve_experience()
        .withf(|token| token.as_ref() == "AB CD")
        .return_once(|_| Ok(detail(10)));
    let state = HttpState::fixtures().with_uids(Arc::new(query), Arc::new(FixtureUidRegistryCommand));

    let (status, body) = call(
        state,
        test::TestRequest::get().uri("/api/v1/experiences/by-uid/AB%20CD"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Laguna Negra");
    assert_eq!(body["category"], "AIRE_LIBRE");
}

#[rstest]
#[actix_web::test]
async fn resolve_by_uid_hides_inactive_tokens_behind_not_found() {
    let mut query = MockUidRegistryQuery::new();
    query
        .expect_resolve_experience()
        .return_once(|_| Err(RegistrationError::InvalidOrInactiveToken.into()));
    let state = HttpState::fixtures().with_uids(Arc::new(query), Arc::new(FixtureUidRegistryCommand));

    let (status, body) = call(
        state,
        test::TestRequest::get().uri("/api/v1/experiences/by-uid/retired"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["reason"], "invalid_or_inactive_token");
}

#[rstest]
#[actix_web::test]
async fn list_uids_requires_session_and_valid_id() {
    let (anonymous, _) = call(
        HttpState::fixtures(),
        test::TestRequest::get().uri(&format!("/api/v1/experiences/{EXPERIENCE}/uids")),
    )
    .await;
    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);

    let (malformed, body) = call(
        HttpState::fixtures(),
        test::TestRequest::get()
            .uri("/api/v1/experiences/not-a-uuid/uids")
            .cookie(session_cookie_for(USER).await),
    )
    .await;
    assert_eq!(malformed, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "experienceId");
}

#[rstest]
#[actix_web::test]
async fn list_uids_returns_payloads() {
    let uid_id = ExperienceUidId::random();
    let mut query = MockUidRegistryQuery::new();
    query
        .expect_list_for_experience()
        .with(eq(experience_id()))
        .return_once(move |experience_id| {
            Ok(vec![ExperienceUidPayload {
                id: uid_id,
                experience_id,
                uid: ScanToken::new("0x4DFE12AB").expect("token").to_string(),
                active: true,
                created_at: Utc::now(),
            }])
        });
    let state = HttpState::fixtures().with_uids(Arc::new(query), Arc::new(FixtureUidRegistryCommand));

    let (status, body) = call(
        state,
        test::TestRequest::get()
            .uri(&format!("/api/v1/experiences/{EXPERIENCE}/uids"))
            .cookie(session_cookie_for(USER).await),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["uid"], "0x4DFE12AB");
    assert_eq!(body[0]["experienceId"], EXPERIENCE);
}

#[rstest]
#[case(json!({"active": false}), StatusCode::OK)]
#[case(json!({}), StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn set_uid_active_requires_flag(#[case] payload: Value, #[case] expected: StatusCode) {
    let uid_id = ExperienceUidId::random();
    let mut command = MockUidRegistryCommand::new();
    command
        .expect_set_active()
        .with(eq(uid_id), eq(false))
        .times(usize::from(expected == StatusCode::OK))
        .returning(|id, active| {
            Ok(ExperienceUidPayload {
                id,
                experience_id: experience_id(),
                uid: "0x4DFE12AB".to_owned(),
                active,
                created_at: Utc::now(),
            })
        });
    let state = HttpState::fixtures().with_uids(
        Arc::new(crate::domain::ports::FixtureUidRegistryQuery),
        Arc::new(command),
    );

    let (status, body) = call(
        state,
        test::TestRequest::put()
            .uri(&format!("/api/v1/experience-uids/{uid_id}/active"))
            .cookie(session_cookie_for(USER).await)
            .set_json(payload),
    )
    .await;

    assert_eq!(status, expected);
    if expected == StatusCode::OK {
        assert_eq!(body["active"], false);
    } else {
        assert_eq!(body["details"]["field"], "active");
    }
}

#[rstest]
#[actix_web::test]
async fn update_points_forwards_raw_value() {
    let mut admin = MockExperienceAdminCommand::new();
    admin
        .expect_update_points()
        .with(eq(experience_id()), eq(-5_i64))
        .return_once(|_, _| Ok(detail(10)));
    let state = HttpState::fixtures().with_experiences_admin(Arc::new(admin));

    let (status, body) = call(
        state,
        test::TestRequest::put()
            .uri(&format!("/api/v1/experiences/{EXPERIENCE}/points"))
            .cookie(session_cookie_for(USER).await)
            .set_json(json!({"points": -5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pointsAwarded"], 10);
}

#[rstest]
#[actix_web::test]
async fn set_visibility_forwards_flag() {
    let mut admin = MockExperienceAdminCommand::new();
    admin
        .expect_set_visibility()
        .with(eq(experience_id()), eq(false))
        .return_once(|_, _| {
            let mut hidden = detail(10);
            hidden.visible = false;
            Ok(hidden)
        });
    let state = HttpState::fixtures().with_experiences_admin(Arc::new(admin));

    let (status, body) = call(
        state,
        test::TestRequest::put()
            .uri(&format!("/api/v1/experiences/{EXPERIENCE}/visibility"))
            .cookie(session_cookie_for(USER).await)
            .set_json(json!({"visible": false})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["visible"], false);
}

#[rstest]
#[actix_web::test]
async fn delete_reports_cascade_counts() {
    let mut admin = MockExperienceAdminCommand::new();
    admin
        .expect_delete_cascade()
        .with(eq(experience_id()))
        .return_once(|_| {
            Ok(CascadeSummary {
                uids_removed: 2,
                registrations_removed: 3,
            })
        });
    let state = HttpState::fixtures().with_experiences_admin(Arc::new(admin));

    let (status, body) = call(
        state,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/experiences/{EXPERIENCE}"))
            .cookie(session_cookie_for(USER).await),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"uidsRemoved": 2, "registrationsRemoved": 3}));
}

#[rstest]
#[actix_web::test]
async fn delete_of_unknown_experience_is_not_found() {
    let (status, body) = call(
        HttpState::fixtures(),
        test::TestRequest::delete()
            .uri(&format!("/api/v1/experiences/{EXPERIENCE}"))
            .cookie(session_cookie_for(USER).await),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}
