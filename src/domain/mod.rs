//! Domain layer: core types, day registry, and event system.
//!
//! This module contains the server-side domain model including day-key
//! identity, snapshot records, day entries with editor state, the event
//! bus for broadcasting state changes, and the day registry for
//! concurrent storage of open days.

pub mod availability_event;
pub mod day_entry;
pub mod day_key;
pub mod day_registry;
pub mod event_bus;
pub mod record;

pub use availability_event::AvailabilityEvent;
pub use day_entry::{DayEntry, DaySummary};
pub use day_key::{DayKey, STORE_KEY_PREFIX};
pub use day_registry::DayRegistry;
pub use event_bus::EventBus;
pub use record::{DailyAvailabilityRecord, SEED_NOTE, Snapshot};
