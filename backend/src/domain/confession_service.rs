//! Confession domain service.
//!
//! Implements the driving ports on top of a [`ConfessionRepository`]. Storage
//! failures are logged here with their detail and surfaced to callers as
//! generic internal errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{
    ConfessionCommand, ConfessionQuery, ConfessionRepository, ConfessionRepositoryError,
    SchemaBootstrap,
};
use crate::domain::{Confession, Error, ListLimit, SubmissionDraft};

/// Message returned when a confession could not be stored.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save confession. Please try again.";

/// Message returned when confessions could not be read.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch confessions";

/// Message returned when storage could not be prepared.
pub const SCHEMA_FAILED_MESSAGE: &str = "Failed to prepare confession storage";

/// Confession service implementing the driving ports.
#[derive(Clone)]
pub struct ConfessionService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ConfessionService<R> {
    /// Create a new service over `repository`, reading time from `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

impl<R> ConfessionService<R>
where
    R: ConfessionRepository,
{
    fn log_storage_error(operation: &'static str, err: &ConfessionRepositoryError) {
        match err {
            ConfessionRepositoryError::DuplicateId { confession_id } => {
                warn!(operation, %confession_id, "confession id already stored");
            }
            ConfessionRepositoryError::Connection { .. } => {
                error!(operation, error = %err, "confession storage unavailable");
            }
            ConfessionRepositoryError::Query { .. } => {
                error!(operation, error = %err, "confession storage query failed");
            }
        }
    }
}

#[async_trait]
impl<R> ConfessionCommand for ConfessionService<R>
where
    R: ConfessionRepository,
{
    async fn submit(&self, draft: SubmissionDraft) -> Result<Confession, Error> {
        let now = self.clock.utc();
        let confession = {
            let mut rng = rand::thread_rng();
            draft.normalize(now, &mut rng)?
        };

        let stored = self.repository.insert(&confession).await.map_err(|err| {
            Self::log_storage_error("insert", &err);
            Error::internal(SAVE_FAILED_MESSAGE)
        })?;

        info!(confession_id = %stored.id, category = %stored.category, "confession stored");
        Ok(stored)
    }
}

#[async_trait]
impl<R> ConfessionQuery for ConfessionService<R>
where
    R: ConfessionRepository,
{
    async fn list_recent(&self, limit: ListLimit) -> Result<Vec<Confession>, Error> {
        self.repository.list_recent(limit).await.map_err(|err| {
            Self::log_storage_error("list_recent", &err);
            Error::internal(FETCH_FAILED_MESSAGE)
        })
    }
}

#[async_trait]
impl<R> SchemaBootstrap for ConfessionService<R>
where
    R: ConfessionRepository,
{
    async fn ensure_schema(&self) -> Result<(), Error> {
        self.repository.ensure_schema().await.map_err(|err| {
            Self::log_storage_error("ensure_schema", &err);
            Error::internal(SCHEMA_FAILED_MESSAGE)
        })
    }
}

#[cfg(test)]
#[path = "confession_service_tests.rs"]
mod tests;
