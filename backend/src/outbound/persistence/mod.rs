//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides the concrete implementation of the confession
//! repository port backed by PostgreSQL via the Diesel ORM with async support
//! through `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: the repository only translates between Diesel models
//!   and domain types. Normalisation happens in the domain before insert.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) never leave this module.
//! - **Async-safe pooling**: connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: all database errors are mapped to
//!   [`crate::domain::ports::ConfessionRepositoryError`].
//!
//! # Example
//!
//! ```no_run
//! use confessions::outbound::persistence::{DbPool, DieselConfessionRepository, PoolConfig};
//!
//! # async fn demo() -> Result<(), confessions::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/confessions")).await?;
//! let repo = DieselConfessionRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_confession_repository;
mod models;
mod pool;
mod schema;

pub use diesel_confession_repository::DieselConfessionRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
