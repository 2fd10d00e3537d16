//! In-process adapters for the passport driven ports.
//!
//! [`InMemoryPassportStore`] keeps users, experiences, UIDs and
//! registrations behind one mutex and implements every driven port with the
//! same atomicity guarantees as the PostgreSQL adapters: `record` performs
//! the uniqueness check, the insert, the optional UID consumption and the
//! balance credit under a single critical section.
//!
//! It backs local runs without a database and the concurrency tests. Local
//! runs load their starting data from a [`MemorySeed`].

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

mod seed;

pub use seed::{MemorySeed, SeedError, SeedExperience, SeedSummary, SeedUser};

use crate::domain::ports::{
    CascadeSummary, ExperienceRepository, ExperienceRepositoryError, RegistrationRepository,
    RegistrationRepositoryError, UidConsumption, UidRegistry, UidRegistryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    Experience, ExperienceDraft, ExperienceId, ExperienceUid, ExperienceUidId, PointsAwarded,
    Registration, ScanToken, User, UserId,
};

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    experiences: HashMap<ExperienceId, Experience>,
    uids: HashMap<ExperienceUidId, ExperienceUid>,
    registrations: Vec<Registration>,
}

/// Shared in-memory store implementing all passport driven ports.
#[derive(Debug, Default)]
pub struct InMemoryPassportStore {
    state: Mutex<StoreState>,
}

impl InMemoryPassportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace a user.
    pub fn seed_user(&self, user: User) {
        self.state().users.insert(user.id().clone(), user);
    }

    /// Insert or replace an experience.
    pub fn seed_experience(&self, experience: Experience) {
        self.state().experiences.insert(experience.id(), experience);
    }

    /// Insert or replace a UID row.
    pub fn seed_uid(&self, uid: ExperienceUid) {
        self.state().uids.insert(uid.id(), uid);
    }

    /// Current snapshot of a user, including the points balance.
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.state().users.get(id).cloned()
    }

    /// Number of stored registrations for the pair.
    pub fn registration_count(&self, user_id: &UserId, experience_id: ExperienceId) -> usize {
        self.state()
            .registrations
            .iter()
            .filter(|r| r.user_id() == user_id && r.experience_id() == experience_id)
            .count()
    }

    /// Total number of stored registrations.
    pub fn total_registrations(&self) -> usize {
        self.state().registrations.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryPassportStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.user(id))
    }

    async fn top_by_points(&self, limit: usize) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self.state().users.values().cloned().collect();
        users.sort_by(|a, b| {
            b.points()
                .cmp(&a.points())
                .then_with(|| a.created_at().cmp(&b.created_at()))
                .then_with(|| a.id().as_uuid().cmp(b.id().as_uuid()))
        });
        users.truncate(limit);
        Ok(users)
    }
}

fn with_points(experience: &Experience, points: PointsAwarded) -> Experience {
    rebuild(experience, points, experience.is_visible())
}

fn with_visibility(experience: &Experience, visible: bool) -> Experience {
    rebuild(experience, experience.points_awarded(), visible)
}

fn rebuild(experience: &Experience, points: PointsAwarded, visible: bool) -> Experience {
    let draft = ExperienceDraft {
        id: experience.id(),
        title: experience.title().to_owned(),
        description: experience.description().map(str::to_owned),
        category: experience.category(),
        cover_image_url: experience.cover_image_url().map(str::to_owned),
        address: experience.address().map(str::to_owned),
        location: experience.location(),
        points_awarded: points,
        visible,
    };
    // The source already passed validation, so rebuilding cannot fail.
    Experience::new(draft).unwrap_or_else(|_| experience.clone())
}

#[async_trait]
impl ExperienceRepository for InMemoryPassportStore {
    async fn find_by_id(
        &self,
        id: ExperienceId,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        Ok(self.state().experiences.get(&id).cloned())
    }

    async fn update_points(
        &self,
        id: ExperienceId,
        points: PointsAwarded,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        let mut state = self.state();
        let Some(current) = state.experiences.get(&id) else {
            return Ok(None);
        };
        let updated = with_points(current, points);
        state.experiences.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn set_visibility(
        &self,
        id: ExperienceId,
        visible: bool,
    ) -> Result<Option<Experience>, ExperienceRepositoryError> {
        let mut state = self.state();
        let Some(current) = state.experiences.get(&id) else {
            return Ok(None);
        };
        let updated = with_visibility(current, visible);
        state.experiences.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_cascade(
        &self,
        id: ExperienceId,
    ) -> Result<Option<CascadeSummary>, ExperienceRepositoryError> {
        let mut state = self.state();
        if state.experiences.remove(&id).is_none() {
            return Ok(None);
        }

        let uids_before = state.uids.len();
        state.uids.retain(|_, uid| uid.experience_id() != id);
        let registrations_before = state.registrations.len();
        state.registrations.retain(|r| r.experience_id() != id);

        Ok(Some(CascadeSummary {
            uids_removed: (uids_before - state.uids.len()) as u64,
            registrations_removed: (registrations_before - state.registrations.len()) as u64,
        }))
    }
}

#[async_trait]
impl UidRegistry for InMemoryPassportStore {
    async fn resolve_active_token(
        &self,
        token: &ScanToken,
    ) -> Result<Option<ExperienceUid>, UidRegistryError> {
        Ok(self
            .state()
            .uids
            .values()
            .find(|uid| uid.is_active() && uid.token() == token)
            .cloned())
    }

    async fn list_for_experience(
        &self,
        experience_id: ExperienceId,
    ) -> Result<Vec<ExperienceUid>, UidRegistryError> {
        let mut uids: Vec<ExperienceUid> = self
            .state()
            .uids
            .values()
            .filter(|uid| uid.experience_id() == experience_id)
            .cloned()
            .collect();
        uids.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(uids)
    }

    async fn set_active(
        &self,
        uid_id: ExperienceUidId,
        active: bool,
    ) -> Result<Option<ExperienceUid>, UidRegistryError> {
        let mut state = self.state();
        let Some(uid) = state.uids.get_mut(&uid_id) else {
            return Ok(None);
        };
        *uid = uid.with_active(active);
        Ok(Some(uid.clone()))
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryPassportStore {
    async fn exists_for(
        &self,
        user_id: &UserId,
        experience_id: ExperienceId,
    ) -> Result<bool, RegistrationRepositoryError> {
        Ok(self.registration_count(user_id, experience_id) > 0)
    }

    async fn record(
        &self,
        registration: &Registration,
        consumption: UidConsumption,
    ) -> Result<u32, RegistrationRepositoryError> {
        let mut state = self.state();

        let Some(user) = state.users.get(registration.user_id()) else {
            return Err(RegistrationRepositoryError::UserMissing);
        };
        let credited = user
            .credited(registration.points_awarded())
            .ok_or(RegistrationRepositoryError::BalanceOverflow)?;

        let duplicate = state.registrations.iter().any(|existing| {
            existing.user_id() == registration.user_id()
                && existing.experience_id() == registration.experience_id()
        });
        if duplicate {
            return Err(RegistrationRepositoryError::Duplicate);
        }

        if consumption == UidConsumption::Deactivate {
            let uid = state
                .uids
                .get_mut(&registration.experience_uid_id())
                .filter(|uid| uid.is_active())
                .ok_or(RegistrationRepositoryError::UidInactive)?;
            *uid = uid.with_active(false);
        }

        let balance = credited.points();
        state.users.insert(credited.id().clone(), credited);
        state.registrations.push(registration.clone());
        Ok(balance)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Registration>, RegistrationRepositoryError> {
        let mut registrations: Vec<Registration> = self
            .state()
            .registrations
            .iter()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect();
        registrations.sort_by(|a, b| {
            b.registered_at()
                .cmp(&a.registered_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(registrations)
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
