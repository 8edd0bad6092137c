//! Concurrent storage of open days with per-day fine-grained locking.
//!
//! [`DayRegistry`] stores all open day entries in a `HashMap` where each
//! entry is individually protected by a [`tokio::sync::RwLock`]. This
//! allows concurrent reads on the same day and concurrent writes on
//! different days; writes to the same day-key are serialized, which is
//! what gives the store its read-your-writes guarantee for a single
//! active editor.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::DayKey;
use super::day_entry::{DayEntry, DaySummary};
use crate::error::GatewayError;

/// In-process source of truth for all open availability days.
#[derive(Debug, Default)]
pub struct DayRegistry {
    days: RwLock<HashMap<DayKey, Arc<RwLock<DayEntry>>>>,
}

impl DayRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new day entry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the day-key is already
    /// open (callers are expected to check first via [`Self::get`]).
    pub async fn insert(&self, entry: DayEntry) -> Result<DayKey, GatewayError> {
        let day = entry.record.date;
        let mut map = self.days.write().await;
        if map.contains_key(&day) {
            return Err(GatewayError::InvalidRequest(format!(
                "day {day} already open"
            )));
        }
        map.insert(day, Arc::new(RwLock::new(entry)));
        Ok(day)
    }

    /// Returns a shared reference to the day entry behind its per-day lock.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DayNotFound`] if the day-key is not open.
    pub async fn get(&self, day: DayKey) -> Result<Arc<RwLock<DayEntry>>, GatewayError> {
        let map = self.days.read().await;
        map.get(&day)
            .cloned()
            .ok_or(GatewayError::DayNotFound(day))
    }

    /// Returns `true` if the day-key is open.
    pub async fn contains(&self, day: DayKey) -> bool {
        self.days.read().await.contains_key(&day)
    }

    /// Returns summaries of all open days, sorted by day-key.
    pub async fn list(&self) -> Vec<DaySummary> {
        let map = self.days.read().await;
        let mut summaries = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            summaries.push(DaySummary::from(&*entry));
        }
        summaries.sort_by_key(|s| s.date);
        summaries
    }

    /// Returns the number of open days.
    pub async fn len(&self) -> usize {
        self.days.read().await.len()
    }

    /// Returns `true` if no day is open.
    pub async fn is_empty(&self) -> bool {
        self.days.read().await.is_empty()
    }
}
