//! Builders for the HTTP state bundle.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::warn;

use travel_backend::inbound::http::state::HttpState;
use travel_backend::outbound::memory::InMemoryStore;
use travel_backend::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselListingRepository, DieselUserRepository,
};
use travel_backend::outbound::security::{Argon2PasswordHasher, HashCost};

use super::ServerConfig;

fn diesel_state(pool: &DbPool, hasher: Arc<Argon2PasswordHasher>) -> HttpState {
    HttpState::from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselListingRepository::new(pool.clone())),
        Arc::new(DieselBookingRepository::new(pool.clone())),
        hasher,
        Arc::new(DefaultClock),
    )
}

fn in_memory_state(hasher: Arc<Argon2PasswordHasher>) -> HttpState {
    warn!("no database configured; data lives in memory and is lost on restart");
    let store = Arc::new(InMemoryStore::new());
    HttpState::from_repositories(
        store.clone(),
        store.clone(),
        store,
        hasher,
        Arc::new(DefaultClock),
    )
}

/// Build the handler state, backed by PostgreSQL when a pool is configured.
///
/// # Errors
/// Returns [`std::io::Error`] if the password hasher rejects its parameters.
pub(crate) fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let hasher = Argon2PasswordHasher::new(HashCost::default())
        .map(Arc::new)
        .map_err(|err| std::io::Error::other(format!("password hasher: {err}")))?;
    Ok(match &config.db_pool {
        Some(pool) => diesel_state(pool, hasher),
        None => in_memory_state(hasher),
    })
}
