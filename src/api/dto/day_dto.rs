//! Day-related DTOs for open, list, snapshot, average, and segment
//! operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DayKey, DaySummary};
use crate::timeline::{SegmentKind, SegmentLine, TimelineGeometry};

/// Request body for `POST /days`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenDayRequest {
    /// Day to open, `YYYY-MM-DD`.
    #[schema(value_type = String)]
    pub date: DayKey,
    /// Fleet total for the day.
    pub total_aircraft: u32,
    /// Planned availability at start of day.
    pub planned_availability: u32,
    /// Flying window start, `HH:MM`.
    pub day_flying_start: String,
    /// Flying window end, `HH:MM`.
    pub day_flying_end: String,
    /// Grid geometry; defaults apply when omitted.
    #[serde(default)]
    pub geometry: Option<GeometryDto>,
}

/// Pixel geometry of the schedule grid the day renders into.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct GeometryDto {
    /// Height of one aircraft row in pixels.
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Horizontal pixels per hour.
    #[serde(default = "default_pixels_per_hour")]
    pub pixels_per_hour: f64,
    /// Hour of day at the grid's left edge.
    #[serde(default)]
    pub start_hour: f64,
}

fn default_row_height() -> f64 {
    40.0
}

fn default_pixels_per_hour() -> f64 {
    60.0
}

impl From<GeometryDto> for TimelineGeometry {
    fn from(dto: GeometryDto) -> Self {
        Self {
            row_height: dto.row_height,
            pixels_per_hour: dto.pixels_per_hour,
            start_hour: dto.start_hour,
        }
    }
}

/// Day summary for list responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DaySummaryDto {
    /// Day-key.
    #[schema(value_type = String)]
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

impl From<DaySummary> for DaySummaryDto {
    fn from(s: DaySummary) -> Self {
        Self {
            date: s.date,
            average_availability: s.average_availability,
            snapshot_count: s.snapshot_count,
            total_aircraft: s.total_aircraft,
            last_modified_at: s.last_modified_at,
        }
    }
}

/// List response for `GET /days`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DayListResponse {
    /// Day summaries, sorted by day-key.
    pub data: Vec<DaySummaryDto>,
    /// Number of open days.
    pub count: usize,
}

/// Request body for `POST /days/{date}/snapshots`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AppendSnapshotRequest {
    /// Time of day of the observation, `HH:MM`. Backfills are accepted;
    /// the log is re-sorted on append.
    pub time: String,
    /// Aircraft available from that instant onward.
    pub available: u32,
    /// Optional reason for the change.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query parameters for `GET /days/{date}/average`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AverageParams {
    /// When `true`, truncate the window at the current time.
    #[serde(default)]
    pub live: bool,
}

/// Response body for `GET /days/{date}/average`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AverageResponse {
    /// Day-key.
    #[schema(value_type = String)]
    pub date: DayKey,
    /// Average availability, one decimal place.
    pub average: f64,
    /// Whether the window was truncated at "now".
    pub live: bool,
}

/// Query parameters for `GET /days/average`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RangeAverageParams {
    /// First day of the range, `YYYY-MM-DD` (inclusive).
    #[param(value_type = String)]
    pub from: DayKey,
    /// Last day of the range, `YYYY-MM-DD` (inclusive).
    #[param(value_type = String)]
    pub to: DayKey,
}

/// Response body for `GET /days/average`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RangeAverageResponse {
    /// First day of the range.
    #[schema(value_type = String)]
    pub from: DayKey,
    /// Last day of the range.
    #[schema(value_type = String)]
    pub to: DayKey,
    /// Plain mean of the daily averages, one decimal place.
    pub average: f64,
}

/// One rendered line of the timeline step function.
#[derive(Debug, Serialize, ToSchema)]
pub struct SegmentLineDto {
    /// Visual class: `"historical"`, `"current"`, or `"connector"`.
    pub kind: &'static str,
    /// Left/start x coordinate in grid pixels.
    pub x1: f64,
    /// Start y coordinate.
    pub y1: f64,
    /// Right/end x coordinate.
    pub x2: f64,
    /// End y coordinate.
    pub y2: f64,
    /// Whether the line is drawn dashed.
    pub dashed: bool,
}

impl From<SegmentLine> for SegmentLineDto {
    fn from(line: SegmentLine) -> Self {
        Self {
            kind: match line.kind {
                SegmentKind::Historical => "historical",
                SegmentKind::Current => "current",
                SegmentKind::Connector => "connector",
            },
            x1: line.x1,
            y1: line.y1,
            x2: line.x2,
            y2: line.y2,
            dashed: line.dashed(),
        }
    }
}

/// Response body for `GET /days/{date}/segments`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SegmentsResponse {
    /// Day-key.
    #[schema(value_type = String)]
    pub date: DayKey,
    /// Render plan lines, in draw order.
    pub lines: Vec<SegmentLineDto>,
}
