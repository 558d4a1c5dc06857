//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::confessions;

/// Row struct for reading from the confessions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = confessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ConfessionRow {
    #[expect(dead_code, reason = "surrogate key is only used for ordering in SQL")]
    pub id: i32,
    pub confession_id: String,
    pub confession: String,
    pub category: Option<String>,
    pub recipient: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new confession records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = confessions)]
pub(crate) struct NewConfessionRow<'a> {
    pub confession_id: &'a str,
    pub confession: &'a str,
    pub category: Option<&'a str>,
    pub recipient: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}
