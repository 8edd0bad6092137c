//! Time-weighted availability aggregation.
//!
//! Availability over an operating day is a step function: each change
//! point carries a new aircraft count that holds until superseded. This
//! module partitions an arbitrary `[start, end)` window into maximal
//! constant-value segments, integrates each segment's contribution, and
//! returns the time-weighted mean.
//!
//! Every function here is total: degenerate input (empty change list,
//! zero-width or inverted window, out-of-order points) degrades to a
//! defined numeric result, never an error. The output feeds a live
//! dashboard control that must not blank on bad input.

/// A single availability change: at `time` the fleet moved to `available`.
///
/// `time` is decimal hours in `[0, 24)`. Inputs need not be sorted; every
/// entry point sorts before segmenting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangePoint {
    /// Time of day in decimal hours.
    pub time: f64,
    /// Aircraft available from this instant onward.
    pub available: u32,
}

impl ChangePoint {
    /// Creates a change point.
    #[must_use]
    pub const fn new(time: f64, available: u32) -> Self {
        Self { time, available }
    }
}

/// A half-open query window `[start, end)` in decimal hours.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    /// Window start in decimal hours.
    pub start: f64,
    /// Window end in decimal hours (exclusive).
    pub end: f64,
}

impl Window {
    /// Creates a window. Inverted windows are representable; they simply
    /// have non-positive duration and aggregate to zero.
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Window duration in hours; non-positive for degenerate windows.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A maximal sub-interval of the window with constant availability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Segment start in decimal hours.
    pub start: f64,
    /// Segment end in decimal hours (exclusive).
    pub end: f64,
    /// Constant availability over the segment.
    pub available: u32,
}

impl Segment {
    /// Segment duration in hours.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Aircraft-hours contributed by this segment.
    #[must_use]
    pub fn contribution(&self) -> f64 {
        f64::from(self.available) * self.duration()
    }
}

/// Rounds to one decimal place, half away from zero.
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sorts change points ascending and discards any at or after `end`.
///
/// Points at or after the window end cannot affect the result and are
/// dropped before segmenting.
fn sorted_relevant(changes: &[ChangePoint], end: f64) -> Vec<ChangePoint> {
    let mut points: Vec<ChangePoint> = changes.iter().copied().filter(|p| p.time < end).collect();
    points.sort_by(|a, b| a.time.total_cmp(&b.time));
    points
}

/// Availability in force at `start` given sorted, filtered change points.
///
/// The most recent point at or before `start` wins. When the window opens
/// before the first change, the first point's value is carried backward.
/// An empty list yields zero. A genuine value of zero at the window start
/// is honored (no falsy fallback).
fn availability_at_start(points: &[ChangePoint], start: f64) -> u32 {
    points
        .iter()
        .rev()
        .find(|p| p.time <= start)
        .or_else(|| points.first())
        .map_or(0, |p| p.available)
}

/// Partitions the window into maximal constant-availability segments.
///
/// The final segment always closes exactly at `window.end`, even when no
/// change point falls there. Returns an empty vector for degenerate
/// windows.
#[must_use]
pub fn build_segments(changes: &[ChangePoint], window: Window) -> Vec<Segment> {
    if window.duration() <= 0.0 {
        return Vec::new();
    }

    let points = sorted_relevant(changes, window.end);
    let mut segments = Vec::with_capacity(points.len() + 1);

    let mut segment_start = window.start;
    let mut available = availability_at_start(&points, window.start);

    for point in &points {
        // A change strictly inside the current segment opens a new one.
        // Points at or before the segment start were already folded into
        // the starting value.
        if point.time > segment_start && point.time < window.end {
            segments.push(Segment {
                start: segment_start,
                end: point.time,
                available,
            });
            segment_start = point.time;
            available = point.available;
        }
    }

    if segment_start < window.end {
        segments.push(Segment {
            start: segment_start,
            end: window.end,
            available,
        });
    }

    segments
}

/// Time-weighted mean availability over the window, rounded to one
/// decimal place.
///
/// Returns `0.0` for degenerate windows (`end <= start`); callers are
/// expected to validate windows upstream, but this never errors.
#[must_use]
pub fn time_weighted_average(changes: &[ChangePoint], window: Window) -> f64 {
    let duration = window.duration();
    if duration <= 0.0 {
        return 0.0;
    }

    let aircraft_hours: f64 = build_segments(changes, window)
        .iter()
        .map(Segment::contribution)
        .sum();

    round_to_tenth(aircraft_hours / duration)
}

/// Live variant of [`time_weighted_average`]: the window is truncated at
/// `now_hours`, so the mean covers `[start, min(now, end))`.
///
/// Returns `0.0` when "now" is still before the window start.
#[must_use]
pub fn live_average(changes: &[ChangePoint], window: Window, now_hours: f64) -> f64 {
    let effective = Window::new(window.start, now_hours.min(window.end));
    time_weighted_average(changes, effective)
}

/// Availability in force at an arbitrary time of day.
///
/// Same carry-backward and empty-list semantics as segment construction.
#[must_use]
pub fn availability_at(changes: &[ChangePoint], at: f64) -> u32 {
    let mut points: Vec<ChangePoint> = changes.to_vec();
    points.sort_by(|a, b| a.time.total_cmp(&b.time));
    availability_at_start(&points, at)
}

/// Arithmetic mean of daily averages, rounded to one decimal place.
///
/// Used for weekly and monthly rollups; an empty slice yields zero.
#[must_use]
pub fn mean_of_daily(averages: &[f64]) -> f64 {
    if averages.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = averages.iter().sum::<f64>() / averages.len() as f64;
    round_to_tenth(mean)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn constant_function_averages_to_its_value() {
        // A single change at or before the window start dominates.
        let changes = [ChangePoint::new(6.0, 7)];
        let avg = time_weighted_average(&changes, Window::new(8.0, 16.0));
        assert_close(avg, 7.0);
    }

    #[test]
    fn weighted_two_segment_window() {
        // {08:00 -> 4, 12:00 -> 2} over [08:00, 16:00):
        // contributions 4x4 + 2x4 = 24, average 24/8 = 3.0.
        let changes = [ChangePoint::new(8.0, 4), ChangePoint::new(12.0, 2)];
        let avg = time_weighted_average(&changes, Window::new(8.0, 16.0));
        assert_close(avg, 3.0);
    }

    #[test]
    fn change_at_or_after_window_end_is_ignored() {
        // A far-future change point must not move the result.
        let base = [ChangePoint::new(8.0, 4), ChangePoint::new(12.0, 2)];
        let with_future = [
            ChangePoint::new(8.0, 4),
            ChangePoint::new(12.0, 2),
            ChangePoint::new(16.0, 9),
            ChangePoint::new(22.0, 1),
        ];
        let window = Window::new(8.0, 16.0);
        assert_close(
            time_weighted_average(&base, window),
            time_weighted_average(&with_future, window),
        );
    }

    #[test]
    fn degenerate_windows_average_to_zero() {
        // Empty and inverted windows.
        let changes = [ChangePoint::new(8.0, 4)];
        assert_close(time_weighted_average(&changes, Window::new(10.0, 10.0)), 0.0);
        assert_close(time_weighted_average(&changes, Window::new(16.0, 8.0)), 0.0);
    }

    #[test]
    fn planning_scenario_rounds_to_tenth() {
        // total=10, planned=8, window 0800-1600, changes 10:30 -> 6 and
        // 14:00 -> 9: (8x2.5 + 6x3.5 + 9x2.0)/8 = 59/8 = 7.375 -> 7.4.
        let changes = [
            ChangePoint::new(8.0, 8),
            ChangePoint::new(10.5, 6),
            ChangePoint::new(14.0, 9),
        ];
        let avg = time_weighted_average(&changes, Window::new(8.0, 16.0));
        assert_close(avg, 7.4);
    }

    #[test]
    fn unsorted_input_is_sorted_before_segmenting() {
        let changes = [
            ChangePoint::new(14.0, 9),
            ChangePoint::new(8.0, 8),
            ChangePoint::new(10.5, 6),
        ];
        let avg = time_weighted_average(&changes, Window::new(8.0, 16.0));
        assert_close(avg, 7.4);
    }

    #[test]
    fn empty_timeline_averages_to_zero() {
        assert_close(time_weighted_average(&[], Window::new(8.0, 16.0)), 0.0);
    }

    #[test]
    fn zero_availability_at_start_is_not_a_fallback() {
        // A genuine 0 at or before the window start must hold, not fall
        // through to a later change point's value.
        let changes = [ChangePoint::new(7.0, 0), ChangePoint::new(12.0, 10)];
        let avg = time_weighted_average(&changes, Window::new(8.0, 16.0));
        // 0x4 + 10x4 = 40, 40/8 = 5.0.
        assert_close(avg, 5.0);
    }

    #[test]
    fn first_change_value_carries_backward() {
        // Window opens before any change: the chronologically first
        // remaining point's value applies from the start.
        let changes = [ChangePoint::new(10.0, 6)];
        let avg = time_weighted_average(&changes, Window::new(8.0, 16.0));
        // 6 from 8.0 (carried back) to 10.0, then 6 onward: constant 6.
        assert_close(avg, 6.0);
    }

    #[test]
    fn segments_close_exactly_at_window_end() {
        let changes = [ChangePoint::new(8.0, 8), ChangePoint::new(10.5, 6)];
        let segments = build_segments(&changes, Window::new(8.0, 16.0));
        let Some(last) = segments.last() else {
            panic!("expected segments");
        };
        assert_close(last.end, 16.0);
        assert_eq!(last.available, 6);
        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn segments_empty_for_degenerate_window() {
        let changes = [ChangePoint::new(8.0, 8)];
        assert!(build_segments(&changes, Window::new(16.0, 8.0)).is_empty());
    }

    #[test]
    fn live_average_truncates_at_now() {
        // Same scenario as the planning test, observed at 12:00: segments
        // 8x2.5 + 6x1.5 = 29 over 4 hours = 7.25 -> 7.3 (half away from
        // zero).
        let changes = [
            ChangePoint::new(8.0, 8),
            ChangePoint::new(10.5, 6),
            ChangePoint::new(14.0, 9),
        ];
        let avg = live_average(&changes, Window::new(8.0, 16.0), 12.0);
        assert_close(avg, 7.3);
    }

    #[test]
    fn live_average_before_window_start_is_zero() {
        let changes = [ChangePoint::new(8.0, 8)];
        assert_close(live_average(&changes, Window::new(8.0, 16.0), 6.0), 0.0);
    }

    #[test]
    fn live_average_after_window_end_matches_full_window() {
        let changes = [ChangePoint::new(8.0, 4), ChangePoint::new(12.0, 2)];
        let window = Window::new(8.0, 16.0);
        assert_close(
            live_average(&changes, window, 22.0),
            time_weighted_average(&changes, window),
        );
    }

    #[test]
    fn availability_at_reports_step_value() {
        let changes = [ChangePoint::new(8.0, 8), ChangePoint::new(10.5, 6)];
        assert_eq!(availability_at(&changes, 9.0), 8);
        assert_eq!(availability_at(&changes, 10.5), 6);
        assert_eq!(availability_at(&changes, 23.0), 6);
        assert_eq!(availability_at(&changes, 7.0), 8); // carried backward
        assert_eq!(availability_at(&[], 12.0), 0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_close(round_to_tenth(7.375), 7.4);
        assert_close(round_to_tenth(7.344), 7.3);
        assert_close(round_to_tenth(7.35), 7.4);
    }

    #[test]
    fn mean_of_daily_averages() {
        assert_close(mean_of_daily(&[7.4, 6.0, 8.1]), 7.2);
        assert_close(mean_of_daily(&[]), 0.0);
    }
}
