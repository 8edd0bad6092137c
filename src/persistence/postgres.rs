//! PostgreSQL implementation of the keyed record store.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::models::StoredRecord;
use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// PostgreSQL-backed record store using `sqlx::PgPool`.
///
/// Writes are last-write-wins: saving a record under an existing storage
/// key replaces the previous value wholesale.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to PostgreSQL using the gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the pool cannot be
    /// established within the configured timeout.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(Self::new(pool))
    }

    /// Upserts a record under its storage key (last-write-wins).
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn save_record(
        &self,
        store_key: &str,
        record: &serde_json::Value,
    ) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO availability_records (store_key, record, updated_at) \
             VALUES ($1, $2, now()) \
             ON CONFLICT (store_key) DO UPDATE \
             SET record = EXCLUDED.record, updated_at = now()",
        )
        .bind(store_key)
        .bind(record)
        .execute(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(())
    }

    /// Loads the record stored under the given key, if any. A miss is
    /// "no record yet", not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn load_record(
        &self,
        store_key: &str,
    ) -> Result<Option<StoredRecord>, GatewayError> {
        let row = sqlx::query_as::<_, (String, serde_json::Value, DateTime<Utc>)>(
            "SELECT store_key, record, updated_at FROM availability_records \
             WHERE store_key = $1",
        )
        .bind(store_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(row.map(|(store_key, record, updated_at)| StoredRecord {
            store_key,
            record,
            updated_at,
        }))
    }

    /// Deletes records last written more than the given number of days ago.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] on database failure.
    pub async fn delete_older_than(&self, before_days: u64) -> Result<u64, GatewayError> {
        let cutoff =
            Utc::now() - chrono::Duration::days(i64::try_from(before_days).unwrap_or(i64::MAX));

        let result = sqlx::query("DELETE FROM availability_records WHERE updated_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
