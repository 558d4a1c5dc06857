//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod confession_command;
mod confession_query;
mod confession_repository;
mod schema_bootstrap;

pub use confession_command::{ConfessionCommand, FixtureConfessionCommand};
#[cfg(test)]
pub use confession_command::MockConfessionCommand;
pub use confession_query::{ConfessionQuery, FixtureConfessionQuery};
#[cfg(test)]
pub use confession_query::MockConfessionQuery;
pub use confession_repository::{
    ConfessionRepository, ConfessionRepositoryError, FixtureConfessionRepository,
};
#[cfg(test)]
pub use confession_repository::MockConfessionRepository;
pub use schema_bootstrap::{FixtureSchemaBootstrap, SchemaBootstrap};
#[cfg(test)]
pub use schema_bootstrap::MockSchemaBootstrap;
