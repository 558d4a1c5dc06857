//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the shared resource (and through it the domain ports) and
//! remain testable without I/O.

use std::sync::Arc;

use cap_std::fs::Dir;

use crate::inbound::resource::ConfessionsResource;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Request/response logic for the API routes.
    pub resource: ConfessionsResource,
    /// Capability handle on the static asset directory, when one is mounted.
    pub assets: Option<Arc<Dir>>,
}

impl HttpState {
    /// Bundle the resource with the asset directory.
    pub fn new(resource: ConfessionsResource, assets: Arc<Dir>) -> Self {
        Self {
            resource,
            assets: Some(assets),
        }
    }

    /// Serve the API only; every asset request is a 404.
    pub fn without_assets(resource: ConfessionsResource) -> Self {
        Self {
            resource,
            assets: None,
        }
    }
}
