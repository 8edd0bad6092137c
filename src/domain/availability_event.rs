//! Domain events reflecting availability state mutations.
//!
//! Every state change emits an [`AvailabilityEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers so
//! dashboards can redraw without polling.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::DayKey;
use super::record::DailyAvailabilityRecord;

/// Domain event emitted after every state mutation.
///
/// Record-carrying variants include the full updated record so that
/// subscribers can redraw immediately instead of issuing a follow-up
/// fetch.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AvailabilityEvent {
    /// Emitted when a new day is opened and its record seeded.
    RecordInitialized {
        /// Day-key of the opened day.
        day: DayKey,
        /// Planned availability carried by the seed snapshot.
        planned: u32,
        /// Fleet total for the day.
        total: u32,
        /// The freshly seeded record.
        record: DailyAvailabilityRecord,
        /// Timestamp of the mutation.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a committed edit changes the current availability.
    AvailabilityChanged {
        /// Day-key of the mutated day.
        day: DayKey,
        /// Availability before the edit.
        previous: u32,
        /// Availability after the edit.
        available: u32,
        /// The updated record (snapshot appended, average recomputed).
        record: DailyAvailabilityRecord,
        /// Timestamp of the mutation.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when an explicit snapshot is appended to the log.
    SnapshotAppended {
        /// Day-key of the mutated day.
        day: DayKey,
        /// Availability carried by the appended snapshot.
        available: u32,
        /// The updated record.
        record: DailyAvailabilityRecord,
        /// Timestamp of the mutation.
        timestamp: DateTime<Utc>,
    },

    /// Periodic tick so subscribers can advance the "now" marker and
    /// refresh live averages. Not tied to any day-key.
    ClockTick {
        /// Tick timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl AvailabilityEvent {
    /// Returns the day-key this event concerns, or `None` for events that
    /// apply to every subscriber (ticks).
    #[must_use]
    pub const fn day_key(&self) -> Option<DayKey> {
        match self {
            Self::RecordInitialized { day, .. }
            | Self::AvailabilityChanged { day, .. }
            | Self::SnapshotAppended { day, .. } => Some(*day),
            Self::ClockTick { .. } => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::RecordInitialized { .. } => "record_initialized",
            Self::AvailabilityChanged { .. } => "availability_changed",
            Self::SnapshotAppended { .. } => "snapshot_appended",
            Self::ClockTick { .. } => "clock_tick",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::timeline::ClockTime;
    use chrono::NaiveDate;

    fn day() -> DayKey {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 3, 14) else {
            panic!("valid date");
        };
        DayKey::new(date)
    }

    fn record() -> DailyAvailabilityRecord {
        let Ok(start) = ClockTime::new(8, 0) else {
            panic!("valid time");
        };
        let Ok(end) = ClockTime::new(16, 0) else {
            panic!("valid time");
        };
        DailyAvailabilityRecord::seeded(day(), 8, 10, start, end)
    }

    #[test]
    fn record_initialized_event_type() {
        let event = AvailabilityEvent::RecordInitialized {
            day: day(),
            planned: 8,
            total: 10,
            record: record(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "record_initialized");
        assert_eq!(event.day_key(), Some(day()));
    }

    #[test]
    fn availability_changed_serializes() {
        let event = AvailabilityEvent::AvailabilityChanged {
            day: day(),
            previous: 8,
            available: 6,
            record: record(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("availability_changed"));
        assert!(json_str.contains("2025-03-14"));
        assert!(json_str.contains("averageAvailability"));
    }

    #[test]
    fn clock_tick_has_no_day_key() {
        let event = AvailabilityEvent::ClockTick {
            timestamp: Utc::now(),
        };
        assert_eq!(event.day_key(), None);
        assert_eq!(event.event_type_str(), "clock_tick");
    }
}
