//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use confessions::domain::RateLimitPolicy;
use confessions::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) static_dir: PathBuf,
    pub(crate) rate_limit: RateLimitPolicy,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr` and backed by
    /// `db_pool`. Assets come from `./public` and the default rate limit
    /// applies until overridden.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            static_dir: PathBuf::from("public"),
            rate_limit: RateLimitPolicy::default(),
        }
    }

    /// Serve front-end assets from `static_dir`.
    #[must_use]
    pub fn with_static_dir(mut self, static_dir: PathBuf) -> Self {
        self.static_dir = static_dir;
        self
    }

    /// Apply `policy` to every `/api` request.
    #[must_use]
    pub fn with_rate_limit(mut self, policy: RateLimitPolicy) -> Self {
        self.rate_limit = policy;
        self
    }
}
