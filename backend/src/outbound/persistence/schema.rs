//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the DDL issued by
//! `DieselConfessionRepository::ensure_schema` exactly.

diesel::table! {
    /// Anonymous confessions, append only.
    confessions (id) {
        /// Surrogate key, never exposed.
        id -> Int4,
        /// Public identifier (unique, max 255 characters).
        confession_id -> Varchar,
        /// Trimmed confession text.
        confession -> Text,
        /// Category label (max 50 characters).
        category -> Nullable<Varchar>,
        /// Addressee (max 100 characters).
        recipient -> Nullable<Varchar>,
        /// Creation time; defines list order.
        created_at -> Timestamptz,
    }
}
