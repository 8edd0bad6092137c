//! Availability service: orchestrates day operations and emits events.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::day_entry::{DayEntry, DaySummary};
use crate::domain::{
    AvailabilityEvent, DailyAvailabilityRecord, DayKey, DayRegistry, EventBus, Snapshot,
};
use crate::error::GatewayError;
use crate::persistence::PostgresStore;
use crate::timeline::aggregator::mean_of_daily;
use crate::timeline::clock;
use crate::timeline::editor::{self, ReleaseOutcome, SegmentLine};
use crate::timeline::{ClockTime, TimelineGeometry};

/// Orchestration layer for all availability operations.
///
/// Stateless coordinator: owns references to [`DayRegistry`] for state,
/// [`EventBus`] for event emission, and an optional [`PostgresStore`] for
/// durability. Every mutation method follows the pattern: acquire the
/// per-day lock, mutate the record, persist best-effort, emit events,
/// return the updated record.
///
/// All time-dependent methods take "now" explicitly so callers (and
/// tests) control the clock.
#[derive(Debug, Clone)]
pub struct AvailabilityService {
    registry: Arc<DayRegistry>,
    event_bus: EventBus,
    store: Option<PostgresStore>,
}

impl AvailabilityService {
    /// Creates a new `AvailabilityService`.
    #[must_use]
    pub fn new(registry: Arc<DayRegistry>, event_bus: EventBus, store: Option<PostgresStore>) -> Self {
        Self {
            registry,
            event_bus,
            store,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`DayRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<DayRegistry> {
        &self.registry
    }

    /// Opens a day: loads its record from the store when one exists,
    /// otherwise seeds a fresh record with the planned availability.
    ///
    /// Only a freshly seeded day emits [`AvailabilityEvent::RecordInitialized`]
    /// and writes to the store; reopening a persisted day is read-only.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the day is already open or the
    /// planned availability exceeds the fleet total.
    #[allow(clippy::too_many_arguments)]
    pub async fn open_day(
        &self,
        day: DayKey,
        total: u32,
        planned: u32,
        day_flying_start: ClockTime,
        day_flying_end: ClockTime,
        geometry: TimelineGeometry,
        now: DateTime<Utc>,
    ) -> Result<DailyAvailabilityRecord, GatewayError> {
        if planned > total {
            return Err(GatewayError::AvailabilityOutOfRange {
                available: planned,
                total,
            });
        }

        if let Some(record) = self.load_stored(day).await {
            let entry = DayEntry::new(record.clone(), total, planned, geometry);
            self.registry.insert(entry).await?;
            tracing::info!(%day, snapshots = record.snapshots.len(), "day reopened from store");
            return Ok(record);
        }

        let record = DailyAvailabilityRecord::seeded(
            day,
            planned,
            total,
            day_flying_start,
            day_flying_end,
        );
        let entry = DayEntry::new(record.clone(), total, planned, geometry);
        self.registry.insert(entry).await?;

        self.persist(&record).await;
        let _ = self.event_bus.publish(AvailabilityEvent::RecordInitialized {
            day,
            planned,
            total,
            record: record.clone(),
            timestamp: now,
        });

        tracing::info!(%day, planned, total, "day opened");
        Ok(record)
    }

    /// Returns the current record for an open day.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::DayNotFound`] if the day is not open.
    pub async fn get_record(&self, day: DayKey) -> Result<DailyAvailabilityRecord, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let entry = entry_lock.read().await;
        Ok(entry.record.clone())
    }

    /// Returns summaries of all open days.
    pub async fn list_days(&self) -> Vec<DaySummary> {
        self.registry.list().await
    }

    /// Appends a snapshot with an explicit timestamp (backfill included).
    ///
    /// The log is re-sorted and the average recomputed on every append, so
    /// out-of-order timestamps are handled transparently.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the day is not open or the available
    /// count exceeds the fleet total.
    pub async fn append_snapshot(
        &self,
        day: DayKey,
        timestamp: DateTime<Utc>,
        available: u32,
        notes: Option<String>,
    ) -> Result<DailyAvailabilityRecord, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let mut entry = entry_lock.write().await;

        if available > entry.total_aircraft {
            return Err(GatewayError::AvailabilityOutOfRange {
                available,
                total: entry.total_aircraft,
            });
        }

        let total = entry.total_aircraft;
        entry
            .record
            .append(Snapshot::new(timestamp, available, total, notes));
        entry.last_modified_at = Utc::now();
        let record = entry.record.clone();
        drop(entry);

        self.persist(&record).await;
        let _ = self.event_bus.publish(AvailabilityEvent::SnapshotAppended {
            day,
            available,
            record: record.clone(),
            timestamp: Utc::now(),
        });

        Ok(record)
    }

    /// Commits an availability edit "as of now".
    ///
    /// The snapshot timestamp combines the day's date with the current
    /// time of day, so editing a past day still records when in the day
    /// the change took effect. No-op when the value equals the current
    /// availability: nothing is appended, persisted, or emitted.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the day is not open or the value
    /// exceeds the fleet total.
    pub async fn set_availability(
        &self,
        day: DayKey,
        available: u32,
        now: DateTime<Utc>,
    ) -> Result<DailyAvailabilityRecord, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let mut entry = entry_lock.write().await;

        if available > entry.total_aircraft {
            return Err(GatewayError::AvailabilityOutOfRange {
                available,
                total: entry.total_aircraft,
            });
        }

        let previous = entry
            .record
            .last_available()
            .unwrap_or(entry.planned_availability);
        if previous == available {
            return Ok(entry.record.clone());
        }

        let timestamp = day.date().and_time(now.time()).and_utc();
        let total = entry.total_aircraft;
        entry
            .record
            .append(Snapshot::new(timestamp, available, total, None));
        entry.last_modified_at = now;
        let record = entry.record.clone();
        drop(entry);

        self.persist(&record).await;
        let _ = self
            .event_bus
            .publish(AvailabilityEvent::AvailabilityChanged {
                day,
                previous,
                available,
                record: record.clone(),
                timestamp: now,
            });

        tracing::info!(%day, previous, available, "availability changed");
        Ok(record)
    }

    /// Starts a drag on the day's current-value line. Returns the initial
    /// fractional preview under the pointer.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::DayNotFound`] if the day is not open.
    pub async fn drag_begin(&self, day: DayKey, pointer_y: f64) -> Result<f64, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let mut entry = entry_lock.write().await;
        let geometry = entry.geometry;
        let total = entry.total_aircraft;
        Ok(entry.drag.begin(pointer_y, &geometry, total))
    }

    /// Updates the drag preview from a pointer move. Returns the new
    /// fractional preview.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::DragNotActive`] if no drag is in
    /// progress for the day.
    pub async fn drag_move(&self, day: DayKey, pointer_y: f64) -> Result<f64, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let mut entry = entry_lock.write().await;
        let geometry = entry.geometry;
        let total = entry.total_aircraft;
        entry
            .drag
            .pointer_move(pointer_y, &geometry, total)
            .ok_or(GatewayError::DragNotActive(day))
    }

    /// Ends a drag: snaps the pointer to a whole aircraft count and,
    /// only if the value changed, commits it via [`Self::set_availability`].
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::DragNotActive`] if no drag is in
    /// progress for the day.
    pub async fn drag_release(
        &self,
        day: DayKey,
        pointer_y: f64,
        now: DateTime<Utc>,
    ) -> Result<ReleaseOutcome, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let mut entry = entry_lock.write().await;
        let geometry = entry.geometry;
        let total = entry.total_aircraft;
        let current = entry
            .record
            .last_available()
            .unwrap_or(entry.planned_availability);
        let outcome = entry
            .drag
            .release(pointer_y, &geometry, total, current)
            .ok_or(GatewayError::DragNotActive(day))?;
        drop(entry);

        if outcome.committed {
            self.set_availability(day, outcome.snapped, now).await?;
        }
        Ok(outcome)
    }

    /// The day's stored time-weighted average over its flying window.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::DayNotFound`] if the day is not open.
    pub async fn average(&self, day: DayKey) -> Result<f64, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let entry = entry_lock.read().await;
        Ok(entry.record.average_availability)
    }

    /// Live average from the flying window start up to "now". Before the
    /// window opens this is `0.0`; after it closes it equals the full-day
    /// average.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::DayNotFound`] if the day is not open.
    pub async fn live_average(
        &self,
        day: DayKey,
        now: DateTime<Utc>,
    ) -> Result<f64, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let entry = entry_lock.read().await;
        Ok(entry.record.live_average(clock::decimal_hours(now.time())))
    }

    /// Plain mean of the daily averages of open days in `[from, to]`,
    /// rounded to one decimal place. `0.0` when no open day falls in the
    /// range.
    pub async fn range_average(&self, from: DayKey, to: DayKey) -> f64 {
        let summaries = self.registry.list().await;
        let averages: Vec<f64> = summaries
            .iter()
            .filter(|s| s.date >= from && s.date <= to)
            .map(|s| s.average_availability)
            .collect();
        mean_of_daily(&averages)
    }

    /// Builds the day's render plan: dashed history up to "now", a solid
    /// draggable line from "now" to end of day at the live preview value
    /// while dragging.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::DayNotFound`] if the day is not open.
    pub async fn render_plan(
        &self,
        day: DayKey,
        now: DateTime<Utc>,
    ) -> Result<Vec<SegmentLine>, GatewayError> {
        let entry_lock = self.registry.get(day).await?;
        let entry = entry_lock.read().await;
        let changes = entry.record.change_points();
        Ok(editor::render_plan(
            &changes,
            clock::decimal_hours(now.time()),
            entry.display_count(),
            &entry.geometry,
        ))
    }

    /// Loads and revalidates a stored record, if the store is enabled and
    /// holds one. Load or decode failures fall back to seeding.
    async fn load_stored(&self, day: DayKey) -> Option<DailyAvailabilityRecord> {
        let store = self.store.as_ref()?;
        let stored = match store.load_record(&day.store_key()).await {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!(%day, error = %e, "record load failed, seeding fresh");
                return None;
            }
        };
        match serde_json::from_value::<DailyAvailabilityRecord>(stored.record) {
            Ok(mut record) => {
                // Stored order is not trusted; derived state is recomputed.
                record.sort_snapshots();
                record.recompute_average();
                Some(record)
            }
            Err(e) => {
                tracing::warn!(%day, error = %e, "stored record malformed, seeding fresh");
                None
            }
        }
    }

    /// Best-effort write-through: a store failure is logged, never
    /// surfaced, so the in-memory record stays authoritative.
    async fn persist(&self, record: &DailyAvailabilityRecord) {
        let Some(store) = &self.store else {
            return;
        };
        match serde_json::to_value(record) {
            Ok(value) => {
                if let Err(e) = store.save_record(&record.date.store_key(), &value).await {
                    tracing::warn!(day = %record.date, error = %e, "record persist failed");
                }
            }
            Err(e) => {
                tracing::warn!(day = %record.date, error = %e, "record serialization failed");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day() -> DayKey {
        let Some(date) = NaiveDate::from_ymd_opt(2025, 3, 14) else {
            panic!("valid date");
        };
        DayKey::new(date)
    }

    fn time(h: u8, m: u8) -> ClockTime {
        let Ok(t) = ClockTime::new(h, m) else {
            panic!("valid time");
        };
        t
    }

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        let Some(ts) = day().date().and_hms_opt(h, m, 0) else {
            panic!("valid timestamp");
        };
        ts.and_utc()
    }

    fn make_service() -> AvailabilityService {
        let registry = Arc::new(DayRegistry::new());
        let event_bus = EventBus::new(1000);
        AvailabilityService::new(registry, event_bus, None)
    }

    async fn open(service: &AvailabilityService) -> DailyAvailabilityRecord {
        let result = service
            .open_day(
                day(),
                10,
                8,
                time(8, 0),
                time(16, 0),
                TimelineGeometry::default(),
                at(7, 0),
            )
            .await;
        let Ok(record) = result else {
            panic!("open_day failed");
        };
        record
    }

    #[tokio::test]
    async fn open_day_seeds_and_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let record = open(&service).await;
        assert_eq!(record.snapshots.len(), 1);
        assert!((record.average_availability - 8.0).abs() < 1e-9);

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "record_initialized");
        assert_eq!(event.day_key(), Some(day()));
    }

    #[tokio::test]
    async fn open_day_rejects_planned_above_total() {
        let service = make_service();
        let result = service
            .open_day(
                day(),
                5,
                8,
                time(8, 0),
                time(16, 0),
                TimelineGeometry::default(),
                at(7, 0),
            )
            .await;
        assert!(matches!(
            result,
            Err(GatewayError::AvailabilityOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn open_day_twice_is_rejected() {
        let service = make_service();
        let _ = open(&service).await;
        let result = service
            .open_day(
                day(),
                10,
                8,
                time(8, 0),
                time(16, 0),
                TimelineGeometry::default(),
                at(7, 0),
            )
            .await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn append_snapshot_recomputes_and_emits() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();
        let _ = open(&service).await;
        let _ = rx.recv().await; // record_initialized

        let result = service
            .append_snapshot(day(), at(10, 30), 6, Some("bird strike".into()))
            .await;
        let Ok(record) = result else {
            panic!("append failed");
        };
        assert_eq!(record.snapshots.len(), 2);
        // (8x2.5 + 6x5.5)/8 = 6.625 -> 6.6
        assert!((record.average_availability - 6.6).abs() < 1e-9);

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "snapshot_appended");
    }

    #[tokio::test]
    async fn append_snapshot_rejects_above_total() {
        let service = make_service();
        let _ = open(&service).await;
        let result = service.append_snapshot(day(), at(10, 0), 11, None).await;
        assert!(matches!(
            result,
            Err(GatewayError::AvailabilityOutOfRange { .. })
        ));
    }

    #[tokio::test]
    async fn set_availability_commits_and_emits_previous() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();
        let _ = open(&service).await;
        let _ = rx.recv().await;

        let result = service.set_availability(day(), 6, at(10, 30)).await;
        let Ok(record) = result else {
            panic!("set failed");
        };
        assert_eq!(record.last_available(), Some(6));

        let event = rx.recv().await;
        let Ok(AvailabilityEvent::AvailabilityChanged {
            previous,
            available,
            ..
        }) = event
        else {
            panic!("expected availability_changed");
        };
        assert_eq!(previous, 8);
        assert_eq!(available, 6);
    }

    #[tokio::test]
    async fn set_availability_unchanged_is_a_noop() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();
        let _ = open(&service).await;
        let _ = rx.recv().await;

        let result = service.set_availability(day(), 8, at(10, 30)).await;
        let Ok(record) = result else {
            panic!("set failed");
        };
        assert_eq!(record.snapshots.len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn drag_flow_commits_on_release() {
        let service = make_service();
        let _ = open(&service).await;
        let geom = TimelineGeometry::default();

        let preview = service.drag_begin(day(), geom.y_for_count(8.0)).await;
        assert!(preview.is_ok());

        let moved = service.drag_move(day(), geom.y_for_count(5.6)).await;
        let Ok(moved) = moved else {
            panic!("move failed");
        };
        assert!((moved - 5.6).abs() < 1e-9);

        let released = service
            .drag_release(day(), geom.y_for_count(5.6), at(12, 0))
            .await;
        let Ok(outcome) = released else {
            panic!("release failed");
        };
        assert_eq!(outcome.snapped, 6);
        assert!(outcome.committed);

        let Ok(record) = service.get_record(day()).await else {
            panic!("day missing");
        };
        assert_eq!(record.last_available(), Some(6));
        assert_eq!(record.snapshots.len(), 2);
    }

    #[tokio::test]
    async fn drag_release_at_current_value_appends_nothing() {
        let service = make_service();
        let _ = open(&service).await;
        let geom = TimelineGeometry::default();

        let _ = service.drag_begin(day(), geom.y_for_count(8.0)).await;
        let released = service
            .drag_release(day(), geom.y_for_count(7.9), at(12, 0))
            .await;
        let Ok(outcome) = released else {
            panic!("release failed");
        };
        assert_eq!(outcome.snapped, 8);
        assert!(!outcome.committed);

        let Ok(record) = service.get_record(day()).await else {
            panic!("day missing");
        };
        assert_eq!(record.snapshots.len(), 1);
    }

    #[tokio::test]
    async fn drag_move_without_begin_is_rejected() {
        let service = make_service();
        let _ = open(&service).await;
        let result = service.drag_move(day(), 100.0).await;
        assert!(matches!(result, Err(GatewayError::DragNotActive(_))));
        let result = service.drag_release(day(), 100.0, at(12, 0)).await;
        assert!(matches!(result, Err(GatewayError::DragNotActive(_))));
    }

    #[tokio::test]
    async fn live_average_truncates_at_now() {
        let service = make_service();
        let _ = open(&service).await;
        let _ = service.set_availability(day(), 6, at(10, 30)).await;

        // At 12:00: 8x2.5 + 6x1.5 = 29 over 4h -> 7.3.
        let live = service.live_average(day(), at(12, 0)).await;
        let Ok(live) = live else {
            panic!("live failed");
        };
        assert!((live - 7.3).abs() < 1e-9);
    }

    #[tokio::test]
    async fn range_average_is_mean_of_daily_averages() {
        let service = make_service();
        let geom = TimelineGeometry::default();
        for (d, planned) in [(14, 8), (15, 6), (16, 7)] {
            let Some(date) = NaiveDate::from_ymd_opt(2025, 3, d) else {
                panic!("valid date");
            };
            let result = service
                .open_day(
                    DayKey::new(date),
                    10,
                    planned,
                    time(8, 0),
                    time(16, 0),
                    geom,
                    at(7, 0),
                )
                .await;
            assert!(result.is_ok());
        }

        let Some(from) = NaiveDate::from_ymd_opt(2025, 3, 14) else {
            panic!("valid date");
        };
        let Some(to) = NaiveDate::from_ymd_opt(2025, 3, 15) else {
            panic!("valid date");
        };
        let mean = service
            .range_average(DayKey::new(from), DayKey::new(to))
            .await;
        assert!((mean - 7.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn render_plan_reflects_drag_preview() {
        let service = make_service();
        let _ = open(&service).await;
        let geom = TimelineGeometry::default();

        let _ = service.drag_begin(day(), geom.y_for_count(3.7)).await;
        let plan = service.render_plan(day(), at(12, 0)).await;
        let Ok(plan) = plan else {
            panic!("plan failed");
        };
        let Some(solid) = plan
            .iter()
            .find(|l| l.kind == crate::timeline::SegmentKind::Current)
        else {
            panic!("expected current line");
        };
        assert!((solid.y1 - geom.y_for_count(3.7)).abs() < 1e-9);
    }
}
