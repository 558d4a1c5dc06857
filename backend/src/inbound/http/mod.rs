//! HTTP inbound adapter exposing the REST endpoints and static assets.

pub mod app;
pub mod assets;
pub mod confessions;
pub mod error;
pub mod health;
pub mod state;

pub use error::ApiResult;
