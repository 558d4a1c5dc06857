//! Driving port for preparing storage before requests are served.
//!
//! The long-running server calls it once at startup and treats failure as
//! fatal. The function adapter calls it lazily on the first invocation.

use async_trait::async_trait;

use crate::domain::Error;

/// Idempotent storage preparation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaBootstrap: Send + Sync {
    /// Create tables and indexes when absent.
    async fn ensure_schema(&self) -> Result<(), Error>;
}

/// Fixture bootstrap that always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSchemaBootstrap;

#[async_trait]
impl SchemaBootstrap for FixtureSchemaBootstrap {
    async fn ensure_schema(&self) -> Result<(), Error> {
        Ok(())
    }
}
