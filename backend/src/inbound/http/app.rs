//! Application assembly for the standalone server.
//!
//! Middleware order, outermost first: `Trace`, security headers, `Cors`.
//! Only the `/api` scope is rate limited; preflight requests are answered by
//! `Cors` before they reach it.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::FixedWindowRateLimiter;
use crate::inbound::http::assets::serve_asset;
use crate::inbound::http::confessions::{
    confessions_method_not_allowed, create_confession, list_confessions,
};
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, health, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::{Cors, RateLimit, Trace};

/// Largest accepted JSON body.
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// JSON extractor configuration shared by every JSON route.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .content_type_required(false)
        .error_handler(json_error_handler)
}

/// Security headers attached to every response.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("Referrer-Policy", "no-referrer"))
}

/// Register the `/api` routes on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(create_confession)
        .service(list_confessions)
        .service(web::resource("/confessions").to(confessions_method_not_allowed))
        .service(health);
}

/// Everything the application factory needs per worker.
#[derive(Clone)]
pub struct AppDependencies {
    /// Handler dependencies.
    pub http_state: web::Data<HttpState>,
    /// Probe state shared with the bootstrap code.
    pub health_state: web::Data<HealthState>,
    /// Limiter shared across workers.
    pub limiter: Arc<FixedWindowRateLimiter>,
}

/// Build the application for one worker.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        health_state,
        limiter,
    } = deps;

    let api = web::scope("/api")
        .wrap(RateLimit::new(limiter))
        .configure(configure_api);

    let app = App::new()
        .app_data(http_state)
        .app_data(health_state)
        .app_data(json_config())
        .wrap(Cors)
        .wrap(security_headers())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    app.default_service(web::to(serve_asset))
}
