//! Driving port for reading a user's passport (points ledger).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, RegistrationReceipt, UserId};

/// A user's running total and their registrations, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Passport {
    pub user_id: UserId,
    pub display_name: String,
    pub total_points: u32,
    pub registrations: Vec<RegistrationReceipt>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PassportQuery: Send + Sync {
    /// Load the passport for `user_id`.
    async fn passport(&self, user_id: &UserId) -> Result<Passport, Error>;
}

/// Fixture query returning an empty passport.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePassportQuery;

#[async_trait]
impl PassportQuery for FixturePassportQuery {
    async fn passport(&self, user_id: &UserId) -> Result<Passport, Error> {
        Ok(Passport {
            user_id: user_id.clone(),
            display_name: "Fixture user".to_owned(),
            total_points: 0,
            registrations: Vec::new(),
        })
    }
}
