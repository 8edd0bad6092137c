//! Day entry combining the availability record with server-side state.
//!
//! Each open day in the registry is stored as a [`DayEntry`]: the
//! persisted record plus the day's fleet parameters, grid geometry, drag
//! interaction state, and operational metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::DayKey;
use super::record::DailyAvailabilityRecord;
use crate::timeline::{DragState, TimelineGeometry};

/// Aggregate for one open day: record, parameters, and editor state.
#[derive(Debug, Clone)]
pub struct DayEntry {
    /// The persisted availability record for this day.
    pub record: DailyAvailabilityRecord,

    /// Fleet size for the day; drag values are clamped to `[0, total]`.
    pub total_aircraft: u32,

    /// Planned availability used to seed the record.
    pub planned_availability: u32,

    /// Pixel mapping for the schedule grid this day renders into.
    pub geometry: TimelineGeometry,

    /// Drag interaction state (one active editor per day-key).
    pub drag: DragState,

    /// When this entry was opened in-process (immutable afterwards).
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last committed mutation.
    pub last_modified_at: DateTime<Utc>,
}

impl DayEntry {
    /// Creates a new entry around a record.
    #[must_use]
    pub fn new(
        record: DailyAvailabilityRecord,
        total_aircraft: u32,
        planned_availability: u32,
        geometry: TimelineGeometry,
    ) -> Self {
        let now = Utc::now();
        Self {
            record,
            total_aircraft,
            planned_availability,
            geometry,
            drag: DragState::Idle,
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Value for the solid (current/future) render segment: the live drag
    /// preview while dragging, otherwise the last committed value.
    #[must_use]
    pub fn display_count(&self) -> f64 {
        self.drag.preview().unwrap_or_else(|| {
            f64::from(
                self.record
                    .last_available()
                    .unwrap_or(self.planned_availability),
            )
        })
    }
}

/// Lightweight summary of an open day for list endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    /// Day-key.
    pub date: DayKey,
    /// Time-weighted average over the flying window.
    pub average_availability: f64,
    /// Number of snapshots in the log.
    pub snapshot_count: usize,
    /// Fleet total for the day.
    pub total_aircraft: u32,
    /// Last committed mutation timestamp.
    pub last_modified_at: DateTime<Utc>,
}

impl From<&DayEntry> for DaySummary {
    fn from(entry: &DayEntry) -> Self {
        Self {
            date: entry.record.date,
            average_availability: entry.record.average_availability,
            snapshot_count: entry.record.snapshots.len(),
            total_aircraft: entry.total_aircraft,
            last_modified_at: entry.last_modified_at,
        }
    }
}
