//! Tests for the passport read service.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockExperienceRepository, MockRegistrationRepository, MockUserRepository,
};
use crate::domain::{
    DisplayName, Email, ErrorCode, ExperienceCategory, ExperienceDraft, ExperienceUidId,
    PointsAwarded, Registration, RegistrationDraft, RegistrationId, User, UserDraft, UserRole,
};

#[fixture]
fn user() -> User {
    User::new(UserDraft {
        id: UserId::random(),
        display_name: DisplayName::new("Grace").expect("name"),
        email: Email::new("grace@example.org").expect("email"),
        role: UserRole::User,
        points: 50,
        active: true,
        created_at: Utc::now(),
    })
}

fn experience(title: &str, points: u32) -> Experience {
    Experience::new(ExperienceDraft {
        id: ExperienceId::random(),
        title: title.to_owned(),
        description: None,
        category: ExperienceCategory::AireLibre,
        cover_image_url: None,
        address: None,
        location: None,
        points_awarded: PointsAwarded::new(points).expect("positive"),
        visible: true,
    })
    .expect("valid experience")
}

fn registration(user: &User, experience: &Experience, points: u32, hours_ago: i64) -> Registration {
    let base = Utc
        .with_ymd_and_hms(2026, 4, 1, 18, 0, 0)
        .single()
        .expect("valid timestamp");
    Registration::new(RegistrationDraft {
        id: RegistrationId::random(),
        user_id: user.id().clone(),
        experience_id: experience.id(),
        experience_uid_id: ExperienceUidId::random(),
        opinion: None,
        cover_image_url: Some(format!("https://cdn.example.test/{points}.jpg")),
        points_awarded: PointsAwarded::new(points).expect("positive"),
        registered_at: base - Duration::hours(hours_ago),
    })
}

#[rstest]
#[tokio::test]
async fn passport_reports_balance_and_snapshotted_entries(user: User) {
    let lagoon = experience("Laguna Negra", 40);
    let canyon = experience("Cañón del Río Lobos", 15);
    let newest = registration(&user, &lagoon, 35, 1);
    let oldest = registration(&user, &canyon, 15, 48);

    let mut users = MockUserRepository::new();
    let stored_user = user.clone();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_user)));
    let mut registrations = MockRegistrationRepository::new();
    let listed = vec![newest.clone(), oldest.clone()];
    registrations
        .expect_list_for_user()
        .times(1)
        .return_once(move |_| Ok(listed));
    let mut experiences = MockExperienceRepository::new();
    let catalogue = [lagoon.clone(), canyon.clone()];
    experiences
        .expect_find_by_id()
        .times(2)
        .returning(move |id| Ok(catalogue.iter().find(|exp| exp.id() == id).cloned()));

    let service = PassportService::new(
        Arc::new(users),
        Arc::new(experiences),
        Arc::new(registrations),
    );
    let passport = service.passport(user.id()).await.expect("passport");

    assert_eq!(passport.total_points, 50);
    assert_eq!(passport.display_name, "Grace");
    assert_eq!(passport.registrations.len(), 2);
    let first = &passport.registrations[0];
    assert_eq!(first.title, "Laguna Negra");
    assert_eq!(first.points_awarded, 35, "snapshot wins over current value");
    assert_eq!(
        first.cover_image_url.as_deref(),
        Some("https://cdn.example.test/35.jpg")
    );
    assert_eq!(passport.registrations[1].title, "Cañón del Río Lobos");
}

#[rstest]
#[tokio::test]
async fn passport_rejects_unknown_user(user: User) {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().return_once(|_| Ok(None));
    let mut registrations = MockRegistrationRepository::new();
    registrations.expect_list_for_user().times(0);

    let service = PassportService::new(
        Arc::new(users),
        Arc::new(MockExperienceRepository::new()),
        Arc::new(registrations),
    );
    let error = service.passport(user.id()).await.expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn passport_maps_registration_outage(user: User) {
    let mut users = MockUserRepository::new();
    let stored_user = user.clone();
    users
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(stored_user)));
    let mut registrations = MockRegistrationRepository::new();
    registrations
        .expect_list_for_user()
        .return_once(|_| Err(RegistrationRepositoryError::connection("down")));

    let service = PassportService::new(
        Arc::new(users),
        Arc::new(MockExperienceRepository::new()),
        Arc::new(registrations),
    );
    let error = service.passport(user.id()).await.expect_err("outage");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
