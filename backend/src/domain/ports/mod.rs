//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`UidRegistry`]) are implemented by the
//! outbound adapters. Driving ports (commands and queries) are implemented by
//! the domain services and consumed by the HTTP handlers.

mod macros;
pub(crate) use macros::define_port_error;

mod experience_admin_command;
mod experience_repository;
mod passport_query;
mod ranking_query;
mod registration_command;
mod registration_repository;
mod uid_registry;
mod uid_registry_command;
mod uid_registry_query;
mod user_repository;

#[cfg(test)]
pub use experience_admin_command::MockExperienceAdminCommand;
pub use experience_admin_command::{ExperienceAdminCommand, FixtureExperienceAdminCommand};
#[cfg(test)]
pub use experience_repository::MockExperienceRepository;
pub use experience_repository::{
    CascadeSummary, ExperienceRepository, ExperienceRepositoryError, FixtureExperienceRepository,
};
#[cfg(test)]
pub use passport_query::MockPassportQuery;
pub use passport_query::{FixturePassportQuery, Passport, PassportQuery};
#[cfg(test)]
pub use ranking_query::MockRankingQuery;
pub use ranking_query::{FixtureRankingQuery, RankingEntry, RankingQuery};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::{FixtureRegistrationCommand, RegisterRequest, RegistrationCommand};
#[cfg(test)]
pub use registration_repository::MockRegistrationRepository;
pub use registration_repository::{
    FixtureRegistrationRepository, RegistrationRepository, RegistrationRepositoryError,
    UidConsumption,
};
#[cfg(test)]
pub use uid_registry::MockUidRegistry;
pub use uid_registry::{FixtureUidRegistry, UidRegistry, UidRegistryError};
#[cfg(test)]
pub use uid_registry_command::MockUidRegistryCommand;
pub use uid_registry_command::{FixtureUidRegistryCommand, UidRegistryCommand};
#[cfg(test)]
pub use uid_registry_query::MockUidRegistryQuery;
pub use uid_registry_query::{
    ExperienceDetail, ExperienceUidPayload, FixtureUidRegistryQuery, UidRegistryQuery,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserRepository, UserRepositoryError};
