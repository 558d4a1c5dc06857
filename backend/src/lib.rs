//! Anonymous confessions service.
//!
//! The library hosts the domain, its storage adapter, both hosting adapters
//! (the standalone actix server and the single-invocation function) and the
//! client used by the form and the `confess` binary.

pub mod client;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod wire;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
