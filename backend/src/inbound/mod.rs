//! Inbound adapters that translate external requests into domain service
//! calls while keeping transport details at the edge.
//!
//! [`http`] hosts the long-running actix-web server; [`function`] serves one
//! request per invocation for serverless and CGI hosting. Both delegate to
//! [`resource::ConfessionsResource`].

pub mod function;
pub mod http;
pub mod resource;
