//! Driving port for reading recent confessions.

use async_trait::async_trait;

use crate::domain::{Confession, Error, ListLimit};

/// Domain use-case port for listing confessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfessionQuery: Send + Sync {
    /// Fetch at most `limit` confessions, newest first.
    async fn list_recent(&self, limit: ListLimit) -> Result<Vec<Confession>, Error>;
}

/// Fixture query returning no confessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConfessionQuery;

#[async_trait]
impl ConfessionQuery for FixtureConfessionQuery {
    async fn list_recent(&self, _limit: ListLimit) -> Result<Vec<Confession>, Error> {
        Ok(Vec::new())
    }
}
