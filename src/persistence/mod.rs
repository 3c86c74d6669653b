//! Persistence layer: PostgreSQL record store.
//!
//! [`postgres::PostgresStore`] holds every durable entity — users, teams,
//! memberships, events, and responses — behind async `sqlx` queries.
//! Concurrent writers are resolved by the database's per-record
//! last-write-wins semantics; no client-side reconciliation exists.

pub mod postgres;

pub use postgres::PostgresStore;
