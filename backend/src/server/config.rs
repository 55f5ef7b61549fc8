//! HTTP server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use travel_backend::inbound::http::session_config::SessionSettings;
use travel_backend::outbound::persistence::DbPool;

/// Everything `create_server` needs beyond the health state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) session_ttl: Duration,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, session_ttl: Duration, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            session_ttl,
            bind_addr,
            db_pool: None,
        }
    }

    /// Use the Diesel adapters over `pool` instead of the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
