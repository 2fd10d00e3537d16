//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see the
//! driving ports, so they stay testable without storage.

use std::sync::Arc;

use crate::domain::ports::{
    ExperienceAdminCommand, FixtureExperienceAdminCommand, FixturePassportQuery,
    FixtureRankingQuery, FixtureRegistrationCommand, FixtureUidRegistryCommand,
    FixtureUidRegistryQuery, PassportQuery, RankingQuery, RegistrationCommand,
    UidRegistryCommand, UidRegistryQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationCommand>,
    pub passport: Arc<dyn PassportQuery>,
    pub ranking: Arc<dyn RankingQuery>,
    pub uids: Arc<dyn UidRegistryQuery>,
    pub uids_command: Arc<dyn UidRegistryCommand>,
    pub experiences_admin: Arc<dyn ExperienceAdminCommand>,
}

impl HttpState {
    /// State backed entirely by fixture ports.
    ///
    /// # Examples
    /// ```
    /// use backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::fixtures();
    /// let _ranking = state.ranking.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            registration: Arc::new(FixtureRegistrationCommand),
            passport: Arc::new(FixturePassportQuery),
            ranking: Arc::new(FixtureRankingQuery),
            uids: Arc::new(FixtureUidRegistryQuery),
            uids_command: Arc::new(FixtureUidRegistryCommand),
            experiences_admin: Arc::new(FixtureExperienceAdminCommand),
        }
    }

    /// Replace the registration command.
    #[must_use]
    pub fn with_registration(mut self, registration: Arc<dyn RegistrationCommand>) -> Self {
        self.registration = registration;
        self
    }

    /// Replace the passport query.
    #[must_use]
    pub fn with_passport(mut self, passport: Arc<dyn PassportQuery>) -> Self {
        self.passport = passport;
        self
    }

    #[must_use]
    pub fn with_ranking(mut self, ranking: Arc<dyn RankingQuery>) -> Self {
        self.ranking = ranking;
        self
    }

    /// Replace both UID registry ports.
    #[must_use]
    pub fn with_uids(
        mut self,
        query: Arc<dyn UidRegistryQuery>,
        command: Arc<dyn UidRegistryCommand>,
    ) -> Self {
        self.uids = query;
        self.uids_command = command;
        self
    }

    #[must_use]
    pub fn with_experiences_admin(mut self, admin: Arc<dyn ExperienceAdminCommand>) -> Self {
        self.experiences_admin = admin;
        self
    }
}
