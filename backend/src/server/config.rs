//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::Clock;
use preguntame::domain::TokenCodec;
use preguntame::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) codec: Arc<TokenCodec>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration backed by in-memory storage.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, codec: Arc<TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bind_addr,
            codec,
            clock,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, every repository port is served by its Diesel adapter.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
