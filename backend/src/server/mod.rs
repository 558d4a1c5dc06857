//! Server construction and dependency wiring.

mod config;

pub use config::ServerConfig;

use std::path::Path;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use cap_std::{ambient_authority, fs::Dir};
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use confessions::domain::ports::SchemaBootstrap;
use confessions::domain::{ConfessionService, FixedWindowRateLimiter};
use confessions::inbound::http::app::{AppDependencies, build_app};
use confessions::inbound::http::health::HealthState;
use confessions::inbound::http::state::HttpState;
use confessions::inbound::resource::ConfessionsResource;
use confessions::outbound::persistence::DieselConfessionRepository;

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Storage is prepared before the socket is bound; the server never starts
/// against a database it cannot use.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// A static directory that cannot be opened is logged and every asset
/// request answers 404; the API still starts.
///
/// # Errors
/// Propagates [`std::io::Error`] when storage preparation fails or binding
/// the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        db_pool,
        static_dir,
        rate_limit,
    } = config;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repository = Arc::new(DieselConfessionRepository::new(db_pool));
    let service = Arc::new(ConfessionService::new(repository, clock.clone()));
    service
        .ensure_schema()
        .await
        .map_err(|err| std::io::Error::other(format!("failed to prepare storage: {err}")))?;
    info!("confession storage ready");

    let resource = ConfessionsResource::new(service.clone(), service, clock.clone());
    let http_state = web::Data::new(match open_assets(&static_dir) {
        Some(assets) => HttpState::new(resource, Arc::new(assets)),
        None => HttpState::without_assets(resource),
    });
    let limiter = Arc::new(FixedWindowRateLimiter::new(rate_limit, clock));

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            health_state: server_health_state.clone(),
            limiter: limiter.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, static_dir = %static_dir.display(), "server listening");
    health_state.mark_ready();
    Ok(server)
}

/// Open the static asset directory, or log why it is unavailable.
fn open_assets(static_dir: &Path) -> Option<Dir> {
    Dir::open_ambient_dir(static_dir, ambient_authority())
        .inspect_err(|err| {
            warn!(
                static_dir = %static_dir.display(),
                error = %err,
                "static directory unavailable; serving the API without assets"
            );
        })
        .ok()
}
