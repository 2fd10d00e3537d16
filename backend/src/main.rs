//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::session::{BuildMode, process_session_settings};
use server::settings::PassportSettings;
use server::{EngineOptions, ServerConfig, create_server, seeded_memory_store};

async fn connect_store(settings: &PassportSettings) -> io::Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("no database configured; registrations are kept in memory only");
        return Ok(None);
    };

    if settings.skip_migrations {
        info!("skipping migrations at operator request");
    } else {
        run_migrations(database_url).await.map_err(io::Error::other)?;
    }

    let config = PoolConfig::new(database_url)
        .with_max_size(settings.db_max_connections())
        .with_checkout_timeout(settings.db_checkout_timeout());
    let pool = DbPool::new(config).await.map_err(io::Error::other)?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PassportSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let session = process_session_settings(&settings, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;

    let engine = EngineOptions {
        lock_timeout: settings.lock_timeout(),
        consumption: settings.uid_consumption(),
        ranking_default_limit: settings.ranking_default_limit(),
    };
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_engine(engine);
    config = match connect_store(&settings).await? {
        Some(pool) => config.with_db_pool(pool),
        None => {
            let store = seeded_memory_store(settings.memory_seed_file.as_deref())
                .map_err(io::Error::other)?;
            config.with_memory_store(store)
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, consumption = ?engine.consumption, "passport server listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
