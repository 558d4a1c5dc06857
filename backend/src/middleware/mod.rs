//! Request middleware.
//!
//! Purpose: request lifecycle concerns shared by every route: trace
//! identifiers, cross-origin headers and per-client rate limiting.

pub mod cors;
pub mod rate_limit;
pub mod trace;

pub use cors::Cors;
pub use rate_limit::RateLimit;
pub use trace::Trace;
