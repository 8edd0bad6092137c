//! Interactive timeline editing: drag state machine and render plan.
//!
//! The dashboard lets an operator drag the "current availability" line to
//! record "availability changed to N as of now". During the drag the
//! preview value is fractional so the line tracks the pointer smoothly;
//! only release snaps to an integer and commits, and only when the value
//! actually changed.
//!
//! The render plan reproduces the step function as dashed historical
//! segments (already in the past relative to "now") and a single solid,
//! draggable segment from "now" to end of day.

use super::aggregator::ChangePoint;
use super::clock::END_OF_DAY_HOURS;

/// Pixel-space mapping between the schedule grid and the timeline model.
///
/// `y = availability x row_height` and
/// `x = (hours - start_hour) x pixels_per_hour`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGeometry {
    /// Height of one aircraft row in pixels.
    pub row_height: f64,
    /// Horizontal pixels per hour of the day.
    pub pixels_per_hour: f64,
    /// Hour of day at the grid's left edge (usually 0).
    pub start_hour: f64,
}

impl Default for TimelineGeometry {
    fn default() -> Self {
        Self {
            row_height: 40.0,
            pixels_per_hour: 60.0,
            start_hour: 0.0,
        }
    }
}

impl TimelineGeometry {
    /// Vertical pixel position for an availability count.
    #[must_use]
    pub fn y_for_count(&self, count: f64) -> f64 {
        count * self.row_height
    }

    /// Horizontal pixel position for a time of day in decimal hours.
    #[must_use]
    pub fn x_for_hours(&self, hours: f64) -> f64 {
        (hours - self.start_hour) * self.pixels_per_hour
    }

    /// Horizontal pixel position of end of day (23:59).
    #[must_use]
    pub fn end_of_day_x(&self) -> f64 {
        self.x_for_hours(END_OF_DAY_HOURS)
    }

    /// Fractional availability for a pointer's vertical position, clamped
    /// to `[0, total]`. Never fails; out-of-range drags are clamped, not
    /// rejected.
    #[must_use]
    pub fn count_for_y(&self, y: f64, total: u32) -> f64 {
        if self.row_height <= 0.0 {
            return 0.0;
        }
        (y / self.row_height).clamp(0.0, f64::from(total))
    }
}

/// Outcome of a drag release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseOutcome {
    /// Pointer value snapped to the nearest integer and clamped.
    pub snapped: u32,
    /// Whether the snapped value differs from the last committed value
    /// (a snapshot should be appended only when `true`).
    pub committed: bool,
}

/// Drag interaction state for one day's timeline.
///
/// Fractional preview lives only in the `Dragging` state; the committed
/// integer value is materialized on release. The two precisions are never
/// mixed in one field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// Pointer captured; `preview` is the clamped fractional value under
    /// the pointer, not yet persisted.
    Dragging {
        /// Live fractional availability tracking the pointer.
        preview: f64,
    },
}

impl DragState {
    /// Returns `true` while a drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Returns the live preview value, if dragging.
    #[must_use]
    pub const fn preview(&self) -> Option<f64> {
        match self {
            Self::Dragging { preview } => Some(*preview),
            Self::Idle => None,
        }
    }

    /// Pointer-down on the current-value line: captures the pointer and
    /// enters `Dragging`. Returns the initial preview value.
    pub fn begin(&mut self, pointer_y: f64, geometry: &TimelineGeometry, total: u32) -> f64 {
        let preview = geometry.count_for_y(pointer_y, total);
        *self = Self::Dragging { preview };
        preview
    }

    /// Pointer-move: recomputes the fractional preview. Returns `None`
    /// when no drag is in progress (stale or dropped events are ignored;
    /// recomputation from the latest position is idempotent).
    pub fn pointer_move(
        &mut self,
        pointer_y: f64,
        geometry: &TimelineGeometry,
        total: u32,
    ) -> Option<f64> {
        if !self.is_dragging() {
            return None;
        }
        let preview = geometry.count_for_y(pointer_y, total);
        *self = Self::Dragging { preview };
        Some(preview)
    }

    /// Pointer-up: snaps the final pointer position to the nearest whole
    /// aircraft, clamps to `[0, total]`, and transitions to `Idle`.
    ///
    /// `current` is the last committed value; `committed` is `false` when
    /// the snapped value equals it (no snapshot should be written).
    /// Returns `None` when no drag is in progress.
    pub fn release(
        &mut self,
        pointer_y: f64,
        geometry: &TimelineGeometry,
        total: u32,
        current: u32,
    ) -> Option<ReleaseOutcome> {
        if !self.is_dragging() {
            return None;
        }
        *self = Self::Idle;

        // Clamped fractional value, then half-away-from-zero rounding.
        let exact = geometry.count_for_y(pointer_y, total);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let snapped = exact.round() as u32;

        Some(ReleaseOutcome {
            snapped,
            committed: snapped != current,
        })
    }
}

/// Visual class of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Dashed horizontal segment, already in the past relative to "now".
    Historical,
    /// Solid horizontal segment from "now" to end of day; draggable.
    Current,
    /// Dashed vertical connector between segments of different value.
    Connector,
}

/// One line of the rendered step function, in grid pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLine {
    /// Visual class (historical, current, or connector).
    pub kind: SegmentKind,
    /// Left/start x coordinate.
    pub x1: f64,
    /// Start y coordinate.
    pub y1: f64,
    /// Right/end x coordinate.
    pub x2: f64,
    /// End y coordinate.
    pub y2: f64,
}

impl SegmentLine {
    /// Returns `true` for dashed line classes.
    #[must_use]
    pub const fn dashed(&self) -> bool {
        !matches!(self.kind, SegmentKind::Current)
    }
}

/// Builds the full render plan for a day's timeline.
///
/// `changes` are the day's snapshots as change points (sorted internally),
/// `now_hours` splits historical from current, and `display_count` is the
/// value for the solid segment: the live drag preview while dragging,
/// otherwise the last committed value.
#[must_use]
pub fn render_plan(
    changes: &[ChangePoint],
    now_hours: f64,
    display_count: f64,
    geometry: &TimelineGeometry,
) -> Vec<SegmentLine> {
    let mut points: Vec<ChangePoint> = changes.to_vec();
    points.sort_by(|a, b| a.time.total_cmp(&b.time));

    let Some(last) = points.last().copied() else {
        return Vec::new();
    };

    let now_x = geometry.x_for_hours(now_hours);
    let end_x = geometry.end_of_day_x();
    // Historical segments never extend past "now" or end of day.
    let history_cutoff = now_x.min(end_x);

    let mut lines = Vec::with_capacity(points.len() * 2 + 2);

    for (i, point) in points.iter().enumerate() {
        let point_x = geometry.x_for_hours(point.time);
        let is_last = i + 1 == points.len();

        // The most recent snapshot is skipped when it sits at or after
        // "now"; it is drawn by the current/backdated section instead.
        if is_last && point_x >= history_cutoff {
            continue;
        }

        // The first segment starts at the grid's left edge (day start).
        let seg_start = if i == 0 { 0.0 } else { point_x };
        let seg_end = points
            .get(i + 1)
            .map_or(history_cutoff, |next| geometry.x_for_hours(next.time));
        let y = geometry.y_for_count(f64::from(point.available));

        lines.push(SegmentLine {
            kind: SegmentKind::Historical,
            x1: seg_start,
            y1: y,
            x2: seg_end,
            y2: y,
        });

        // Instantaneous jump between different values.
        if i > 0
            && let Some(prev) = points.get(i - 1)
            && prev.available != point.available
        {
            lines.push(SegmentLine {
                kind: SegmentKind::Connector,
                x1: seg_start,
                y1: geometry.y_for_count(f64::from(prev.available)),
                x2: seg_start,
                y2: y,
            });
        }
    }

    if now_x < end_x {
        let last_x = geometry.x_for_hours(last.time);

        // A backdated snapshot lies ahead of "now": dashed at its value
        // between "now" and its timestamp, solid takes over from "now".
        if now_x < last_x {
            let y = geometry.y_for_count(f64::from(last.available));
            lines.push(SegmentLine {
                kind: SegmentKind::Historical,
                x1: now_x,
                y1: y,
                x2: last_x,
                y2: y,
            });
        }

        let y = geometry.y_for_count(display_count);
        lines.push(SegmentLine {
            kind: SegmentKind::Current,
            x1: now_x,
            y1: y,
            x2: end_x,
            y2: y,
        });
    }

    lines
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn geometry() -> TimelineGeometry {
        TimelineGeometry {
            row_height: 40.0,
            pixels_per_hour: 60.0,
            start_hour: 0.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn pointer_maps_to_fractional_count() {
        let geom = geometry();
        assert_close(geom.count_for_y(100.0, 10), 2.5);
        assert_close(geom.y_for_count(2.5), 100.0);
    }

    #[test]
    fn drag_beyond_row_range_is_clamped() {
        // Pointer positions past either edge never escape [0, total].
        let geom = geometry();
        assert_close(geom.count_for_y(-55.0, 10), 0.0);
        assert_close(geom.count_for_y(10_000.0, 10), 10.0);
    }

    #[test]
    fn preview_tracks_pointer_without_rounding() {
        let geom = geometry();
        let mut drag = DragState::Idle;
        assert!(!drag.is_dragging());

        let preview = drag.begin(100.0, &geom, 10);
        assert_close(preview, 2.5);
        assert!(drag.is_dragging());

        let moved = drag.pointer_move(99.6, &geom, 10);
        let Some(moved) = moved else {
            panic!("expected preview");
        };
        assert_close(moved, 2.49);
        assert_eq!(drag.preview(), Some(2.49));
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let geom = geometry();
        let mut drag = DragState::Idle;
        assert_eq!(drag.pointer_move(100.0, &geom, 10), None);
        assert_eq!(drag.release(100.0, &geom, 10, 5), None);
    }

    #[test]
    fn release_rounds_half_away_from_zero() {
        // 2.49 commits 2, exactly 2.5 commits 3 (half away from zero).
        let geom = geometry();

        let mut drag = DragState::Idle;
        drag.begin(99.6, &geom, 10);
        let Some(outcome) = drag.release(99.6, &geom, 10, 5) else {
            panic!("expected outcome");
        };
        assert_eq!(outcome.snapped, 2);
        assert!(outcome.committed);

        let mut drag = DragState::Idle;
        drag.begin(100.0, &geom, 10);
        let Some(outcome) = drag.release(100.0, &geom, 10, 5) else {
            panic!("expected outcome");
        };
        assert_eq!(outcome.snapped, 3);
        assert!(outcome.committed);
    }

    #[test]
    fn release_at_current_value_does_not_commit() {
        // A release at the current value is a no-op.
        let geom = geometry();
        let mut drag = DragState::Idle;
        drag.begin(geom.y_for_count(6.1), &geom, 10);
        let Some(outcome) = drag.release(geom.y_for_count(6.1), &geom, 10, 6) else {
            panic!("expected outcome");
        };
        assert_eq!(outcome.snapped, 6);
        assert!(!outcome.committed);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn release_clamps_before_snapping() {
        let geom = geometry();
        let mut drag = DragState::Idle;
        drag.begin(10_000.0, &geom, 10);
        let Some(outcome) = drag.release(10_000.0, &geom, 10, 10) else {
            panic!("expected outcome");
        };
        assert_eq!(outcome.snapped, 10);
        assert!(!outcome.committed);
    }

    #[test]
    fn plan_splits_history_and_current_at_now() {
        let geom = geometry();
        let changes = [ChangePoint::new(8.0, 8), ChangePoint::new(10.5, 6)];
        let lines = render_plan(&changes, 12.0, 6.0, &geom);

        // First snapshot: day start to 10:30 at value 8.
        let historical: Vec<&SegmentLine> = lines
            .iter()
            .filter(|l| l.kind == SegmentKind::Historical)
            .collect();
        let Some(first) = historical.first() else {
            panic!("expected historical lines");
        };
        assert_close(first.x1, 0.0);
        assert_close(first.x2, geom.x_for_hours(10.5));
        assert_close(first.y1, geom.y_for_count(8.0));

        // Most recent snapshot extends to "now".
        let Some(second) = historical.get(1) else {
            panic!("expected second historical line");
        };
        assert_close(second.x2, geom.x_for_hours(12.0));

        // One connector for the 8 -> 6 jump.
        let connectors: Vec<&SegmentLine> = lines
            .iter()
            .filter(|l| l.kind == SegmentKind::Connector)
            .collect();
        assert_eq!(connectors.len(), 1);
        let Some(conn) = connectors.first() else {
            panic!("expected connector");
        };
        assert_close(conn.x1, geom.x_for_hours(10.5));
        assert!(conn.dashed());

        // Solid from "now" to end of day at the display value.
        let current: Vec<&SegmentLine> = lines
            .iter()
            .filter(|l| l.kind == SegmentKind::Current)
            .collect();
        assert_eq!(current.len(), 1);
        let Some(solid) = current.first() else {
            panic!("expected current line");
        };
        assert_close(solid.x1, geom.x_for_hours(12.0));
        assert_close(solid.x2, geom.end_of_day_x());
        assert_close(solid.y1, geom.y_for_count(6.0));
        assert!(!solid.dashed());
    }

    #[test]
    fn plan_uses_drag_preview_for_current_line() {
        let geom = geometry();
        let changes = [ChangePoint::new(8.0, 8)];
        let lines = render_plan(&changes, 12.0, 3.7, &geom);
        let Some(solid) = lines.iter().find(|l| l.kind == SegmentKind::Current) else {
            panic!("expected current line");
        };
        assert_close(solid.y1, geom.y_for_count(3.7));
    }

    #[test]
    fn backdated_snapshot_splits_at_now() {
        // Snapshot at 14:00 entered while "now" is 12:00: dashed between
        // now and the snapshot at its value, solid from now onward.
        let geom = geometry();
        let changes = [ChangePoint::new(8.0, 8), ChangePoint::new(14.0, 5)];
        let lines = render_plan(&changes, 12.0, 5.0, &geom);

        let Some(backdated) = lines
            .iter()
            .filter(|l| l.kind == SegmentKind::Historical)
            .find(|l| (l.x1 - geom.x_for_hours(12.0)).abs() < 1e-9)
        else {
            panic!("expected backdated dashed segment");
        };
        assert_close(backdated.x2, geom.x_for_hours(14.0));
        assert_close(backdated.y1, geom.y_for_count(5.0));

        let Some(solid) = lines.iter().find(|l| l.kind == SegmentKind::Current) else {
            panic!("expected current line");
        };
        assert_close(solid.x1, geom.x_for_hours(12.0));
    }

    #[test]
    fn day_over_renders_no_solid_segment() {
        let geom = geometry();
        let changes = [ChangePoint::new(8.0, 8), ChangePoint::new(10.5, 6)];
        let lines = render_plan(&changes, 24.5, 6.0, &geom);

        assert!(lines.iter().all(|l| l.kind != SegmentKind::Current));
        // Last historical segment is clipped at end of day, not "now".
        let Some(last) = lines
            .iter()
            .filter(|l| l.kind == SegmentKind::Historical)
            .next_back()
        else {
            panic!("expected historical lines");
        };
        assert_close(last.x2, geom.end_of_day_x());
    }

    #[test]
    fn empty_timeline_renders_nothing() {
        let geom = geometry();
        assert!(render_plan(&[], 12.0, 0.0, &geom).is_empty());
    }

    #[test]
    fn equal_values_get_no_connector() {
        let geom = geometry();
        let changes = [ChangePoint::new(8.0, 6), ChangePoint::new(10.0, 6)];
        let lines = render_plan(&changes, 12.0, 6.0, &geom);
        assert!(lines.iter().all(|l| l.kind != SegmentKind::Connector));
    }
}
