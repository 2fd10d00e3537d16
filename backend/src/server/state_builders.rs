//! Builders wiring driven adapters into the HTTP state.

use std::path::Path;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use backend::domain::ports::{
    ExperienceRepository, RegistrationRepository, UidRegistry, UserRepository,
};
use backend::domain::{
    ExperienceAdminService, PassportService, RankingService, RegistrationService,
    RegistrationStores, UidRegistryService, UserLocks,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{InMemoryPassportStore, MemorySeed, SeedError};
use backend::outbound::persistence::{
    DbPool, DieselExperienceRepository, DieselRegistrationRepository, DieselUidRegistry,
    DieselUserRepository,
};

use super::config::{EngineOptions, ServerConfig};

/// Wire every driving port over one set of driven adapters.
fn wire_services<U, X, G, R>(
    stores: RegistrationStores<U, X, G, R>,
    engine: EngineOptions,
) -> HttpState
where
    U: UserRepository + 'static,
    X: ExperienceRepository + 'static,
    G: UidRegistry + 'static,
    R: RegistrationRepository + 'static,
{
    let RegistrationStores {
        users,
        experiences,
        uids,
        registrations,
    } = stores.clone();

    let registration = RegistrationService::new(stores, Arc::new(DefaultClock))
        .with_locks(UserLocks::new(engine.lock_timeout))
        .with_consumption(engine.consumption);
    let passport = PassportService::new(
        Arc::clone(&users),
        Arc::clone(&experiences),
        registrations,
    );
    let ranking = RankingService::new(users).with_default_limit(engine.ranking_default_limit);
    let uid_registry = Arc::new(UidRegistryService::new(uids, Arc::clone(&experiences)));

    HttpState {
        registration: Arc::new(registration),
        passport: Arc::new(passport),
        ranking: Arc::new(ranking),
        uids: uid_registry.clone(),
        uids_command: uid_registry,
        experiences_admin: Arc::new(ExperienceAdminService::new(experiences)),
    }
}

fn diesel_stores(
    pool: &DbPool,
    engine: EngineOptions,
) -> RegistrationStores<
    DieselUserRepository,
    DieselExperienceRepository,
    DieselUidRegistry,
    DieselRegistrationRepository,
> {
    RegistrationStores {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        experiences: Arc::new(DieselExperienceRepository::new(pool.clone())),
        uids: Arc::new(DieselUidRegistry::new(pool.clone())),
        registrations: Arc::new(
            DieselRegistrationRepository::new(pool.clone()).with_lock_timeout(engine.lock_timeout),
        ),
    }
}

fn memory_stores(
    store: &Arc<InMemoryPassportStore>,
) -> RegistrationStores<
    InMemoryPassportStore,
    InMemoryPassportStore,
    InMemoryPassportStore,
    InMemoryPassportStore,
> {
    RegistrationStores {
        users: Arc::clone(store),
        experiences: Arc::clone(store),
        uids: Arc::clone(store),
        registrations: Arc::clone(store),
    }
}

/// In-memory store for runs without a database, loaded from `seed_file`
/// when one is given.
///
/// # Errors
/// Propagates [`SeedError`] for unreadable or invalid seed files.
pub fn seeded_memory_store(
    seed_file: Option<&Path>,
) -> Result<Arc<InMemoryPassportStore>, SeedError> {
    let store = Arc::new(InMemoryPassportStore::new());
    let Some(path) = seed_file else {
        warn!(
            "in-memory store starts empty: no user, experience or scan token exists, \
             so every registration fails until PASSPORT_MEMORY_SEED_FILE names a seed"
        );
        return Ok(store);
    };

    let summary = store.apply_seed(&MemorySeed::from_file(path)?)?;
    info!(
        path = %path.display(),
        users = summary.users,
        experiences = summary.experiences,
        uids = summary.uids,
        "in-memory store seeded"
    );
    Ok(store)
}

/// Build the HTTP state, backed by PostgreSQL when a pool is configured and
/// by the prepared (or a fresh) in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => wire_services(diesel_stores(pool, config.engine), config.engine),
        None => {
            let store = config
                .memory_store
                .clone()
                .unwrap_or_else(|| Arc::new(InMemoryPassportStore::new()));
            wire_services(memory_stores(&store), config.engine)
        }
    };
    web::Data::new(state)
}
