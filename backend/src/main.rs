//! Server entry-point: loads settings, prepares storage and serves the API
//! together with the front-end assets.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use confessions::inbound::http::health::HealthState;
use confessions::outbound::persistence::DbPool;
use confessions::settings::{ServerSettings, database_url_from_env};
use server::{ServerConfig, create_server};

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

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let database_url =
        database_url_from_env(&DefaultEnv::new()).map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let db_pool = DbPool::new(settings.pool_config(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("failed to create database pool: {e}")))?;

    let config = ServerConfig::new(bind_addr, db_pool)
        .with_static_dir(settings.static_dir())
        .with_rate_limit(settings.rate_limit_policy());

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config).await?.await
}
