//! PostgreSQL-backed `ConfessionRepository` implementation using Diesel ORM.
//!
//! Each operation checks out one pooled connection for its own scope. The
//! guard returns the connection to the pool when it drops, on success and on
//! every error path alike.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{RunQueryDsl, SimpleAsyncConnection};
use tracing::debug;

use crate::domain::ports::{ConfessionRepository, ConfessionRepositoryError};
use crate::domain::{Confession, ConfessionId, DEFAULT_CATEGORY, DEFAULT_RECIPIENT, ListLimit};

use super::models::{ConfessionRow, NewConfessionRow};
use super::pool::{DbPool, PoolError};
use super::schema::confessions;

/// Idempotent DDL for the confessions table and its ordering index.
pub(crate) const CREATE_CONFESSIONS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS confessions (
    id SERIAL PRIMARY KEY,
    confession_id VARCHAR(255) UNIQUE NOT NULL,
    confession TEXT NOT NULL,
    category VARCHAR(50),
    recipient VARCHAR(100),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX IF NOT EXISTS confessions_created_at_idx
    ON confessions (created_at DESC);
";

/// Diesel-backed implementation of the `ConfessionRepository` port.
#[derive(Clone)]
pub struct DieselConfessionRepository {
    pool: DbPool,
}

impl DieselConfessionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain confession repository errors.
fn map_pool_error(error: PoolError) -> ConfessionRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ConfessionRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to domain confession repository errors.
///
/// `confession_id` names the row being written, if any, so unique
/// violations can report it.
fn map_diesel_error(
    error: diesel::result::Error,
    confession_id: Option<&str>,
) -> ConfessionRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ConfessionRepositoryError::duplicate_id(confession_id.unwrap_or("<unknown>"))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ConfessionRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => ConfessionRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            ConfessionRepositoryError::query("database query error")
        }
        _ => ConfessionRepositoryError::query("database error"),
    }
}

fn filled(value: Option<String>, default: &str) -> String {
    value
        .filter(|raw| !raw.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Convert a database row to a domain confession, filling nullable columns.
/// Stored identifiers are taken as they are.
fn row_to_confession(row: ConfessionRow) -> Confession {
    Confession {
        id: ConfessionId::from_stored(row.confession_id),
        text: row.confession,
        category: filled(row.category, DEFAULT_CATEGORY),
        recipient: filled(row.recipient, DEFAULT_RECIPIENT),
        created_at: row.created_at,
    }
}

#[async_trait]
impl ConfessionRepository for DieselConfessionRepository {
    async fn ensure_schema(&self) -> Result<(), ConfessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.batch_execute(CREATE_CONFESSIONS_SQL)
            .await
            .map_err(|err| map_diesel_error(err, None))
    }

    async fn insert(
        &self,
        confession: &Confession,
    ) -> Result<Confession, ConfessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewConfessionRow {
            confession_id: confession.id.as_str(),
            confession: confession.text.as_str(),
            category: Some(confession.category.as_str()),
            recipient: Some(confession.recipient.as_str()),
            created_at: confession.created_at,
        };

        let row: ConfessionRow = diesel::insert_into(confessions::table)
            .values(&new_row)
            .returning(ConfessionRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, Some(confession.id.as_str())))?;

        Ok(row_to_confession(row))
    }

    async fn list_recent(
        &self,
        limit: ListLimit,
    ) -> Result<Vec<Confession>, ConfessionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ConfessionRow> = confessions::table
            .select(ConfessionRow::as_select())
            .order((confessions::created_at.desc(), confessions::id.desc()))
            .limit(limit.as_i64())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, None))?;

        Ok(rows.into_iter().map(row_to_confession).collect())
    }
}
