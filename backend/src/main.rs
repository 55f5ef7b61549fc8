//! Backend entry-point: loads settings, prepares persistence and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use travel_backend::inbound::http::health::HealthState;
use travel_backend::inbound::http::session_config::{
    BuildMode, SessionToggles, session_settings,
};
use travel_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use travel_backend::settings::AppSettings;

fn other(context: &str, error: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{context}: {error}"))
}

async fn connect(settings: &AppSettings, database_url: &str) -> std::io::Result<DbPool> {
    let applied = run_pending_migrations(database_url)
        .await
        .map_err(|error| other("apply migrations", error))?;
    info!(applied, "database migrations up to date");

    let config = PoolConfig::new(database_url)
        .with_max_size(settings.db_pool_size().map_err(|error| other("settings", error))?)
        .with_connection_timeout(settings.db_pool_timeout());
    DbPool::new(config)
        .await
        .map_err(|error| other("create database pool", error))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|error| other("load settings", error))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| other("settings", error))?;
    let session = session_settings(
        &SessionToggles::from(&settings),
        BuildMode::from_debug_assertions(),
    )
    .map_err(|error| other("session configuration", error))?;

    let session_ttl = settings
        .session_ttl()
        .map_err(|error| other("settings", error))?;

    let mut config = ServerConfig::new(session, session_ttl, bind_addr);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect(&settings, database_url).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}
