//! Tests for the in-memory passport store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    DisplayName, Email, ExperienceCategory, ExperienceUidDraft, RegistrationDraft, RegistrationId,
    UserDraft, UserRole,
};

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn user(name: &str, points: u32, created_offset_minutes: i64) -> User {
    User::new(UserDraft {
        id: UserId::random(),
        display_name: DisplayName::new(name).expect("name"),
        email: Email::new(format!("{}@example.org", name.to_lowercase())).expect("email"),
        role: UserRole::User,
        points,
        active: true,
        created_at: epoch() + Duration::minutes(created_offset_minutes),
    })
}

fn experience(points: u32) -> Experience {
    Experience::new(ExperienceDraft {
        id: ExperienceId::random(),
        title: "Alcázar".to_owned(),
        description: None,
        category: ExperienceCategory::Monumento,
        cover_image_url: None,
        address: None,
        location: None,
        points_awarded: PointsAwarded::new(points).expect("positive"),
        visible: true,
    })
    .expect("valid experience")
}

fn uid(experience_id: ExperienceId, token: &str, offset_minutes: i64) -> ExperienceUid {
    ExperienceUid::new(ExperienceUidDraft {
        id: ExperienceUidId::random(),
        experience_id,
        token: ScanToken::new(token).expect("token"),
        active: true,
        created_at: epoch() + Duration::minutes(offset_minutes),
    })
}

fn registration(user: &User, uid: &ExperienceUid, points: u32, at_minutes: i64) -> Registration {
    Registration::new(RegistrationDraft {
        id: RegistrationId::random(),
        user_id: user.id().clone(),
        experience_id: uid.experience_id(),
        experience_uid_id: uid.id(),
        opinion: None,
        cover_image_url: None,
        points_awarded: PointsAwarded::new(points).expect("positive"),
        registered_at: epoch() + Duration::minutes(at_minutes),
    })
}

struct Seeded {
    store: InMemoryPassportStore,
    user: User,
    experience: Experience,
    uid: ExperienceUid,
}

#[fixture]
fn seeded() -> Seeded {
    let store = InMemoryPassportStore::new();
    let user = user("Ada", 0, 0);
    let experience = experience(20);
    let uid = uid(experience.id(), "alcazar-door", 0);
    store.seed_user(user.clone());
    store.seed_experience(experience.clone());
    store.seed_uid(uid.clone());
    Seeded {
        store,
        user,
        experience,
        uid,
    }
}

#[rstest]
#[tokio::test]
async fn record_credits_balance_once_and_rejects_duplicates(seeded: Seeded) {
    let first = registration(&seeded.user, &seeded.uid, 20, 0);
    let balance = seeded
        .store
        .record(&first, UidConsumption::Keep)
        .await
        .expect("first record");
    assert_eq!(balance, 20);

    let second = registration(&seeded.user, &seeded.uid, 20, 5);
    let err = seeded
        .store
        .record(&second, UidConsumption::Keep)
        .await
        .expect_err("duplicate");
    assert_eq!(err, RegistrationRepositoryError::Duplicate);

    let stored = seeded.store.user(seeded.user.id()).expect("user");
    assert_eq!(stored.points(), 20);
    assert_eq!(
        seeded
            .store
            .registration_count(seeded.user.id(), seeded.experience.id()),
        1
    );
}

#[rstest]
#[tokio::test]
async fn record_fails_for_missing_user(seeded: Seeded) {
    let ghost = user("Ghost", 0, 0);
    let err = seeded
        .store
        .record(&registration(&ghost, &seeded.uid, 20, 0), UidConsumption::Keep)
        .await
        .expect_err("missing user");
    assert_eq!(err, RegistrationRepositoryError::UserMissing);
    assert_eq!(seeded.store.total_registrations(), 0);
}

#[rstest]
#[tokio::test]
async fn deactivate_consumption_flips_uid_and_blocks_reuse(seeded: Seeded) {
    let token = seeded.uid.token().clone();
    seeded
        .store
        .record(
            &registration(&seeded.user, &seeded.uid, 20, 0),
            UidConsumption::Deactivate,
        )
        .await
        .expect("record");

    assert!(
        seeded
            .store
            .resolve_active_token(&token)
            .await
            .expect("lookup")
            .is_none()
    );

    let other = user("Grace", 0, 1);
    seeded.store.seed_user(other.clone());
    let err = seeded
        .store
        .record(
            &registration(&other, &seeded.uid, 20, 1),
            UidConsumption::Deactivate,
        )
        .await
        .expect_err("uid consumed");
    assert_eq!(err, RegistrationRepositoryError::UidInactive);
    assert_eq!(
        seeded.store.user(other.id()).expect("user").points(),
        0,
        "failed record must not credit"
    );
}

#[rstest]
#[tokio::test]
async fn resolve_ignores_inactive_rows(seeded: Seeded) {
    UidRegistry::set_active(&seeded.store, seeded.uid.id(), false)
        .await
        .expect("deactivate")
        .expect("uid exists");
    let found = seeded
        .store
        .resolve_active_token(seeded.uid.token())
        .await
        .expect("lookup");
    assert!(found.is_none());
}

#[rstest]
#[tokio::test]
async fn list_for_experience_orders_by_creation(seeded: Seeded) {
    let later = uid(seeded.experience.id(), "later", 30);
    let earlier = uid(seeded.experience.id(), "earlier", -30);
    seeded.store.seed_uid(later);
    seeded.store.seed_uid(earlier);
    seeded.store.seed_uid(uid(ExperienceId::random(), "elsewhere", 0));

    let listed = seeded
        .store
        .list_for_experience(seeded.experience.id())
        .await
        .expect("list");
    let tokens: Vec<&str> = listed.iter().map(|u| u.token().as_ref()).collect();
    assert_eq!(tokens, ["earlier", "alcazar-door", "later"]);
}

#[rstest]
#[tokio::test]
async fn top_by_points_breaks_ties_by_creation_time() {
    let store = InMemoryPassportStore::new();
    let veteran = user("Veteran", 50, 0);
    let newcomer = user("Newcomer", 50, 10);
    let leader = user("Leader", 80, 20);
    let trailing = user("Trailing", 5, 30);
    for u in [&newcomer, &trailing, &leader, &veteran] {
        store.seed_user(u.clone());
    }

    let top = store.top_by_points(3).await.expect("ranking");
    let names: Vec<&str> = top.iter().map(|u| u.display_name().as_ref()).collect();
    assert_eq!(names, ["Leader", "Veteran", "Newcomer"]);
}

#[rstest]
#[tokio::test]
async fn list_for_user_is_newest_first(seeded: Seeded) {
    let second_experience = experience(15);
    let second_uid = uid(second_experience.id(), "second", 0);
    seeded.store.seed_experience(second_experience);
    seeded.store.seed_uid(second_uid.clone());

    seeded
        .store
        .record(
            &registration(&seeded.user, &seeded.uid, 20, 0),
            UidConsumption::Keep,
        )
        .await
        .expect("older");
    seeded
        .store
        .record(
            &registration(&seeded.user, &second_uid, 15, 60),
            UidConsumption::Keep,
        )
        .await
        .expect("newer");

    let listed = seeded
        .store
        .list_for_user(seeded.user.id())
        .await
        .expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].experience_id(), second_uid.experience_id());
}

#[rstest]
#[tokio::test]
async fn delete_cascade_removes_only_owned_rows(seeded: Seeded) {
    let keep_experience = experience(10);
    let keep_uid = uid(keep_experience.id(), "keep", 0);
    seeded.store.seed_experience(keep_experience.clone());
    seeded.store.seed_uid(keep_uid.clone());
    seeded.store.seed_uid(uid(seeded.experience.id(), "second-door", 1));

    seeded
        .store
        .record(
            &registration(&seeded.user, &seeded.uid, 20, 0),
            UidConsumption::Keep,
        )
        .await
        .expect("record doomed");
    seeded
        .store
        .record(
            &registration(&seeded.user, &keep_uid, 10, 1),
            UidConsumption::Keep,
        )
        .await
        .expect("record kept");

    let summary = seeded
        .store
        .delete_cascade(seeded.experience.id())
        .await
        .expect("delete")
        .expect("experience existed");

    assert_eq!(summary.uids_removed, 2);
    assert_eq!(summary.registrations_removed, 1);
    assert_eq!(seeded.store.total_registrations(), 1);
    assert!(
        ExperienceRepository::find_by_id(&seeded.store, keep_experience.id())
            .await
            .expect("lookup")
            .is_some()
    );
    assert_eq!(
        seeded.store.user(seeded.user.id()).expect("user").points(),
        30,
        "balances are history and stay untouched"
    );
}

#[rstest]
#[tokio::test]
async fn update_points_keeps_other_fields(seeded: Seeded) {
    let updated = seeded
        .store
        .update_points(seeded.experience.id(), PointsAwarded::new(99).expect("positive"))
        .await
        .expect("update")
        .expect("exists");
    assert_eq!(updated.points_awarded().value(), 99);
    assert_eq!(updated.title(), seeded.experience.title());
    assert!(updated.is_visible());
}
