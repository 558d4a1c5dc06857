//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: the confession endpoints, the liveness payload under `/api`
//!   and the orchestration probes
//! - **Schemas**: the wire envelopes from [`crate::wire`]
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use utoipa::OpenApi;

use crate::wire::{
    ConfessionBody, CreatedEnvelope, ErrorEnvelope, HealthEnvelope, ListEnvelope, ListedConfession,
    SubmissionPayload,
};

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Confessions API",
        description = "Anonymous confession submission and public listing."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::confessions::create_confession,
        crate::inbound::http::confessions::list_confessions,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        SubmissionPayload,
        ConfessionBody,
        ListedConfession,
        CreatedEnvelope,
        ListEnvelope,
        HealthEnvelope,
        ErrorEnvelope
    )),
    tags(
        (name = "confessions", description = "Submitting and reading confessions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
