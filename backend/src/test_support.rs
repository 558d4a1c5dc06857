//! Test utilities for the confessions crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is compiled for unit tests and, through
//! the `test-support` feature, for the integration suites.

pub mod clock {
    //! Deterministic clocks.

    use std::sync::Mutex;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    /// Clock frozen at a settable instant.
    #[derive(Debug)]
    pub struct FixtureClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FixtureClock {
        /// Clock frozen at `now`.
        pub fn new(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        /// Move the clock forward by `delta`.
        pub fn advance(&self, delta: TimeDelta) {
            let mut now = self.now.lock().unwrap_or_else(|err| err.into_inner());
            *now += delta;
        }
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap_or_else(|err| err.into_inner())
        }
    }
}

pub mod memory {
    //! In-memory confession storage honouring the repository contract.

    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::domain::ports::{ConfessionRepository, ConfessionRepositoryError};
    use crate::domain::{Confession, ListLimit};

    /// Repository keeping rows in insertion order.
    ///
    /// Enforces unique identifiers, orders listings newest first with
    /// insertion order breaking ties, and can be switched into a failing mode
    /// where every call returns a connection error.
    #[derive(Debug, Default)]
    pub struct InMemoryConfessionRepository {
        rows: Mutex<Vec<Confession>>,
        failing: AtomicBool,
        schema_calls: AtomicUsize,
    }

    impl InMemoryConfessionRepository {
        /// Empty repository.
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every subsequent call fail (or succeed again).
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Snapshot of stored rows in insertion order.
        pub fn rows(&self) -> Vec<Confession> {
            self.rows
                .lock()
                .unwrap_or_else(|err| err.into_inner())
                .clone()
        }

        /// Number of `ensure_schema` calls seen.
        pub fn schema_calls(&self) -> usize {
            self.schema_calls.load(Ordering::SeqCst)
        }

        fn check_available(&self) -> Result<(), ConfessionRepositoryError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ConfessionRepositoryError::connection(
                    "in-memory repository is offline",
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ConfessionRepository for InMemoryConfessionRepository {
        async fn ensure_schema(&self) -> Result<(), ConfessionRepositoryError> {
            self.schema_calls.fetch_add(1, Ordering::SeqCst);
            self.check_available()
        }

        async fn insert(
            &self,
            confession: &Confession,
        ) -> Result<Confession, ConfessionRepositoryError> {
            self.check_available()?;
            let mut rows = self.rows.lock().unwrap_or_else(|err| err.into_inner());
            if rows.iter().any(|row| row.id == confession.id) {
                return Err(ConfessionRepositoryError::duplicate_id(
                    confession.id.as_str(),
                ));
            }
            rows.push(confession.clone());
            Ok(confession.clone())
        }

        async fn list_recent(
            &self,
            limit: ListLimit,
        ) -> Result<Vec<Confession>, ConfessionRepositoryError> {
            self.check_available()?;
            let rows = self.rows.lock().unwrap_or_else(|err| err.into_inner());
            let mut ordered: Vec<(usize, &Confession)> = rows.iter().enumerate().collect();
            ordered.sort_by(|(left_seq, left), (right_seq, right)| {
                right
                    .created_at
                    .cmp(&left.created_at)
                    .then_with(|| right_seq.cmp(left_seq))
            });
            Ok(ordered
                .into_iter()
                .take(limit.as_usize())
                .map(|(_, confession)| confession.clone())
                .collect())
        }
    }
}

pub mod assets {
    //! Temporary static asset directories.

    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};
    use tempfile::TempDir;

    /// Create a temporary directory holding `files` (relative path, contents)
    /// and return it together with a capability handle on it.
    ///
    /// Keep the [`TempDir`] alive for as long as the handle is used.
    pub fn asset_dir(files: &[(&str, &str)]) -> io::Result<(TempDir, Dir)> {
        let temp = tempfile::tempdir()?;
        let dir = Dir::open_ambient_dir(temp.path(), ambient_authority())?;
        for (name, contents) in files {
            let path = Path::new(name);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                dir.create_dir_all(parent)?;
            }
            dir.write(path, contents.as_bytes())?;
        }
        Ok((temp, dir))
    }
}

pub mod openapi {
    //! OpenAPI schema traversal helpers.
    //!
    //! Resolves utoipa `RefOr<Schema>` wrappers to concrete `Object` schemas
    //! with diagnostic messages on type mismatches.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic if not an Object.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            RefOr::T(Schema::Array(_)) => {
                panic!("schema '{name}' is an Array, not an Object");
            }
            _ => panic!("schema '{name}' has unexpected type"),
        }
    }

    /// Get a property from an Object schema by name.
    ///
    /// Panics if the property does not exist.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}
