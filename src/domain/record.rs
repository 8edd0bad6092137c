//! Snapshots and the daily availability record.
//!
//! A [`Snapshot`] is an immutable observation of fleet state at an
//! instant. A [`DailyAvailabilityRecord`] is the persisted aggregate for
//! one day-key: an append-only, timestamp-sorted snapshot log plus the
//! time-weighted average over the day's flying window.
//!
//! The serialized form of these types is an external contract (the keyed
//! record store and the dashboard both read it), hence the camelCase
//! field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DayKey;
use crate::timeline::aggregator::{self, ChangePoint, Window};
use crate::timeline::clock::{self, ClockTime};

/// Note attached to the synthetic snapshot that seeds a new record.
pub const SEED_NOTE: &str = "Initial planned availability at start of day";

/// An immutable observation of fleet state at an instant.
///
/// `available` holds from `timestamp` until superseded by the next
/// snapshot, or until end of day if it is the last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Absolute point in time of the observation.
    pub timestamp: DateTime<Utc>,
    /// Aircraft available from this instant onward.
    pub available: u32,
    /// Fleet total for the day (expected constant across a day's log).
    pub total: u32,
    /// Optional human-readable reason for the change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Snapshot {
    /// Creates a snapshot.
    #[must_use]
    pub const fn new(
        timestamp: DateTime<Utc>,
        available: u32,
        total: u32,
        notes: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            available,
            total,
            notes,
        }
    }

    /// The snapshot's time of day in decimal hours (minute precision).
    #[must_use]
    pub fn decimal_hours(&self) -> f64 {
        clock::decimal_hours(self.timestamp.time())
    }

    /// This snapshot as an aggregator change point.
    #[must_use]
    pub fn change_point(&self) -> ChangePoint {
        ChangePoint::new(self.decimal_hours(), self.available)
    }
}

/// The persisted availability aggregate for one day-key.
///
/// Mutated only by appending snapshots; existing entries are never
/// rewritten or removed. `average_availability` is recomputed after every
/// append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAvailabilityRecord {
    /// Day-key uniquely identifying this record.
    pub date: DayKey,
    /// Snapshot log, ordered by timestamp.
    pub snapshots: Vec<Snapshot>,
    /// Time-weighted mean over the flying window, one decimal place.
    pub average_availability: f64,
    /// Start of the window over which the average is meaningful.
    pub day_flying_start: ClockTime,
    /// End of the window over which the average is meaningful.
    pub day_flying_end: ClockTime,
}

impl DailyAvailabilityRecord {
    /// Creates a fresh record seeded with one synthetic snapshot at the
    /// first instant of the day (00:00:01) carrying the planned
    /// availability.
    #[must_use]
    pub fn seeded(
        date: DayKey,
        planned_availability: u32,
        total: u32,
        day_flying_start: ClockTime,
        day_flying_end: ClockTime,
    ) -> Self {
        let day_start = date
            .date()
            .and_hms_opt(0, 0, 1)
            .unwrap_or_else(|| date.date().and_time(chrono::NaiveTime::MIN))
            .and_utc();

        let seed = Snapshot::new(
            day_start,
            planned_availability,
            total,
            Some(SEED_NOTE.to_string()),
        );

        let mut record = Self {
            date,
            snapshots: vec![seed],
            average_availability: 0.0,
            day_flying_start,
            day_flying_end,
        };
        record.recompute_average();
        record
    }

    /// The flying window as an aggregator window.
    #[must_use]
    pub fn window(&self) -> Window {
        Window::new(
            self.day_flying_start.as_hours(),
            self.day_flying_end.as_hours(),
        )
    }

    /// The snapshot log as sorted-agnostic change points.
    #[must_use]
    pub fn change_points(&self) -> Vec<ChangePoint> {
        self.snapshots.iter().map(Snapshot::change_point).collect()
    }

    /// Sorts snapshots by timestamp. Called after every append; "now"
    /// based timestamps mixed with backfilled entries can arrive out of
    /// order, so insertion order is never trusted.
    pub fn sort_snapshots(&mut self) {
        self.snapshots.sort_by_key(|s| s.timestamp);
    }

    /// Appends a snapshot, re-sorts, and recomputes the average.
    pub fn append(&mut self, snapshot: Snapshot) {
        self.snapshots.push(snapshot);
        self.sort_snapshots();
        self.recompute_average();
    }

    /// Recomputes the time-weighted average over the flying window.
    pub fn recompute_average(&mut self) {
        self.average_availability =
            aggregator::time_weighted_average(&self.change_points(), self.window());
    }

    /// The most recent snapshot, by timestamp order.
    #[must_use]
    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// The currently committed availability (last snapshot's value).
    #[must_use]
    pub fn last_available(&self) -> Option<u32> {
        self.last_snapshot().map(|s| s.available)
    }

    /// Live average from the flying window start up to "now".
    #[must_use]
    pub fn live_average(&self, now_hours: f64) -> f64 {
        aggregator::live_average(&self.change_points(), self.window(), now_hours)
    }
}
