//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the passport driven ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Business rules live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Transactional writes**: registration and cascade delete each run in
//!   one transaction and roll back on any failure.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/passport")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_experience_repository;
mod diesel_registration_repository;
mod diesel_uid_registry;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_experience_repository::DieselExperienceRepository;
pub use diesel_registration_repository::DieselRegistrationRepository;
pub use diesel_uid_registry::DieselUidRegistry;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{
    DEFAULT_CHECKOUT_TIMEOUT, DEFAULT_MAX_CONNECTIONS, DbPool, PoolConfig, PoolError,
};
