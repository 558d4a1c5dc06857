//! CGI/serverless entry-point: serves exactly one request read from the
//! CGI environment and standard input, then exits.
//!
//! The rate limiter lives in process memory and every invocation starts a
//! fresh process, so under plain CGI each client always sees a full
//! allowance. Responses still carry the `X-RateLimit-*` headers. Deploy the
//! standalone `confessions` server, or a host that keeps the function
//! process warm, when limiting must hold across requests.

use std::sync::Arc;

use mockable::{Clock, DefaultClock, DefaultEnv};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use confessions::domain::{ConfessionService, FixedWindowRateLimiter, RateLimitPolicy};
use confessions::inbound::function::{FunctionHandler, FunctionRequest};
use confessions::inbound::resource::ConfessionsResource;
use confessions::outbound::persistence::{DbPool, DieselConfessionRepository, PoolConfig};
use confessions::settings::database_url_from_env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    // Logs go to stderr; stdout carries the CGI response.
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let database_url = database_url_from_env(&env).map_err(std::io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("failed to create database pool: {e}")))?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let repository = Arc::new(DieselConfessionRepository::new(pool));
    let service = Arc::new(ConfessionService::new(repository, clock.clone()));
    let resource = ConfessionsResource::new(service.clone(), service.clone(), clock.clone());
    let limiter = Arc::new(FixedWindowRateLimiter::new(RateLimitPolicy::default(), clock));
    let handler = FunctionHandler::new(resource, service, limiter);

    let request = FunctionRequest::from_cgi(&env, std::io::stdin().lock())?;
    let response = handler.handle(request).await;
    response.write_cgi(std::io::stdout().lock())
}
