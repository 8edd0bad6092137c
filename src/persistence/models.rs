//! Database models for the keyed record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored record row from the `availability_records` table.
///
/// One row per day, identified by its storage key
/// (`"aircraft-availability-YYYY-MM-DD"`). The record itself is stored as
/// JSONB in the exact shape the dashboard reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Storage key, the prefixed day-key.
    pub store_key: String,
    /// Full daily record as JSONB.
    pub record: serde_json::Value,
    /// Server-side timestamp of the last write.
    pub updated_at: DateTime<Utc>,
}
