//! Passport (points ledger) read service.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    ExperienceRepository, ExperienceRepositoryError, Passport, PassportQuery,
    RegistrationRepository, RegistrationRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{Error, Experience, ExperienceId, RegistrationReceipt, UserId};

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_registration_error(error: RegistrationRepositoryError) -> Error {
    match error {
        RegistrationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("registration repository unavailable: {message}"))
        }
        other => Error::internal(format!("registration repository error: {other}")),
    }
}

fn map_experience_error(error: ExperienceRepositoryError) -> Error {
    match error {
        ExperienceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("experience repository unavailable: {message}"))
        }
        ExperienceRepositoryError::Query { message } => {
            Error::internal(format!("experience repository error: {message}"))
        }
    }
}

/// Service implementing [`PassportQuery`].
pub struct PassportService<U, X, R> {
    users: Arc<U>,
    experiences: Arc<X>,
    registrations: Arc<R>,
}

impl<U, X, R> PassportService<U, X, R> {
    pub fn new(users: Arc<U>, experiences: Arc<X>, registrations: Arc<R>) -> Self {
        Self {
            users,
            experiences,
            registrations,
        }
    }
}

impl<U, X, R> PassportService<U, X, R>
where
    X: ExperienceRepository,
{
    async fn experience(
        &self,
        cache: &mut HashMap<ExperienceId, Option<Experience>>,
        id: ExperienceId,
    ) -> Result<Option<Experience>, Error> {
        if let Some(found) = cache.get(&id) {
            return Ok(found.clone());
        }
        let found = self
            .experiences
            .find_by_id(id)
            .await
            .map_err(map_experience_error)?;
        cache.insert(id, found.clone());
        Ok(found)
    }
}

#[async_trait]
impl<U, X, R> PassportQuery for PassportService<U, X, R>
where
    U: UserRepository,
    X: ExperienceRepository,
    R: RegistrationRepository,
{
    async fn passport(&self, user_id: &UserId) -> Result<Passport, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;

        let registrations = self
            .registrations
            .list_for_user(user_id)
            .await
            .map_err(map_registration_error)?;

        let mut cache = HashMap::new();
        let mut receipts = Vec::with_capacity(registrations.len());
        for registration in &registrations {
            // Cascade deletes remove registrations with their experience, so a
            // miss here only happens mid-delete.
            if let Some(experience) = self
                .experience(&mut cache, registration.experience_id())
                .await?
            {
                receipts.push(RegistrationReceipt::from_parts(registration, &experience));
            }
        }

        Ok(Passport {
            user_id: user.id().clone(),
            display_name: user.display_name().as_ref().to_owned(),
            total_points: user.points(),
            registrations: receipts,
        })
    }
}

#[cfg(test)]
#[path = "passport_service_tests.rs"]
mod tests;
