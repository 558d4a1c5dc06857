//! Port for confession persistence.
//!
//! The [`ConfessionRepository`] trait is the only way the domain touches
//! storage. Adapters own the table layout and map driver failures onto
//! [`ConfessionRepositoryError`].

use async_trait::async_trait;

use crate::domain::{Confession, ListLimit};

use super::define_port_error;

define_port_error! {
    /// Errors raised by confession repository adapters.
    pub enum ConfessionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "confession repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "confession repository query failed: {message}",
        /// A confession with the same external identifier already exists.
        DuplicateId { confession_id: String } =>
            "confession {confession_id} already exists",
    }
}

/// Port for storing and listing confessions.
///
/// # Ordering
///
/// [`ConfessionRepository::list_recent`] returns newest first by
/// `created_at`; ties fall back to insertion order, newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfessionRepository: Send + Sync {
    /// Create the backing table and index when absent. Idempotent.
    async fn ensure_schema(&self) -> Result<(), ConfessionRepositoryError>;

    /// Insert a normalised confession and return the stored record.
    ///
    /// Fails with [`ConfessionRepositoryError::DuplicateId`] when the
    /// identifier is already taken.
    async fn insert(&self, confession: &Confession)
    -> Result<Confession, ConfessionRepositoryError>;

    /// Fetch at most `limit` confessions, newest first.
    async fn list_recent(
        &self,
        limit: ListLimit,
    ) -> Result<Vec<Confession>, ConfessionRepositoryError>;
}

/// Fixture repository that stores nothing.
///
/// Inserts echo the confession back and listings are always empty. Use it
/// where persistence behaviour is not under test.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureConfessionRepository;

#[async_trait]
impl ConfessionRepository for FixtureConfessionRepository {
    async fn ensure_schema(&self) -> Result<(), ConfessionRepositoryError> {
        Ok(())
    }

    async fn insert(
        &self,
        confession: &Confession,
    ) -> Result<Confession, ConfessionRepositoryError> {
        Ok(confession.clone())
    }

    async fn list_recent(
        &self,
        _limit: ListLimit,
    ) -> Result<Vec<Confession>, ConfessionRepositoryError> {
        Ok(Vec::new())
    }
}
