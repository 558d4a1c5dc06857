//! Server settings loaded via OrthoConfig.
//!
//! Every value can come from `CONFESSIONS_*` environment variables, a
//! configuration file or command-line flags. The database URL is the one
//! secret and is read separately from `DATABASE_URL` so it never appears in
//! configuration dumps.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::RateLimitPolicy;
use crate::outbound::persistence::PoolConfig;

/// Environment variable holding the PostgreSQL connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_STATIC_DIR: &str = "public";

/// Errors raised while resolving settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// The configured host and port do not form a socket address.
    #[error("invalid bind address '{value}'")]
    InvalidBindAddr { value: String },
}

/// Values controlling the standalone server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONFESSIONS")]
pub struct ServerSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    #[ortho_config(default = 3000)]
    pub port: u16,
    /// Directory holding the front-end assets.
    pub static_dir: Option<PathBuf>,
    /// Requests admitted per client and window.
    pub rate_limit_max: Option<u32>,
    /// Rate limit window length in seconds.
    pub rate_limit_window_secs: Option<u32>,
    /// Largest number of pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout_secs: Option<u64>,
    /// Seconds an idle pooled connection is kept.
    pub db_idle_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Configured host, defaulting to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Socket address built from host and port.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] when the host is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = format!("{}:{}", self.host(), self.port());
        value
            .parse()
            .map_err(|_| SettingsError::InvalidBindAddr { value })
    }

    /// Static asset directory, defaulting to `public`.
    pub fn static_dir(&self) -> PathBuf {
        self.static_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR))
    }

    /// Rate limit policy with defaults for unset values.
    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy::new(
            self.rate_limit_max
                .unwrap_or(RateLimitPolicy::DEFAULT_MAX_REQUESTS),
            self.rate_limit_window_secs
                .unwrap_or(RateLimitPolicy::DEFAULT_WINDOW_SECS),
        )
    }

    /// Pool configuration for `database_url` with overrides applied.
    pub fn pool_config(&self, database_url: &str) -> PoolConfig {
        let mut config = PoolConfig::new(database_url);
        if let Some(max) = self.db_max_connections {
            config = config.with_max_size(max);
        }
        if let Some(secs) = self.db_connect_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = self.db_idle_timeout_secs {
            config = config.with_idle_timeout(Some(Duration::from_secs(secs)));
        }
        config
    }
}

/// Read the database URL from `env`.
///
/// # Errors
/// Returns [`SettingsError::MissingEnv`] when the variable is unset or blank.
///
/// # Examples
/// ```
/// use confessions::settings::database_url_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(|_| Some("postgres://localhost/confessions".to_owned()));
/// let url = database_url_from_env(&env).expect("url present");
/// assert_eq!(url, "postgres://localhost/confessions");
/// ```
pub fn database_url_from_env<E: Env>(env: &E) -> Result<String, SettingsError> {
    env.string(DATABASE_URL_ENV)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::MissingEnv {
            name: DATABASE_URL_ENV,
        })
}
