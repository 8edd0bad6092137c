//! Persistence layer: PostgreSQL keyed record store.
//!
//! Daily availability records are stored whole, as JSONB, under their
//! prefixed day-key. The store is optional; with persistence disabled the
//! gateway runs purely in-memory and records live only as long as the
//! process.

pub mod models;
pub mod postgres;

pub use models::StoredRecord;
pub use postgres::PostgresStore;
