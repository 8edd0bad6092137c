//! Day handlers: open, list, get, snapshots, averages, segments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{
    AppendSnapshotRequest, AverageParams, AverageResponse, DayListResponse, DaySummaryDto,
    OpenDayRequest, RangeAverageParams, RangeAverageResponse, SegmentLineDto, SegmentsResponse,
};
use crate::app_state::AppState;
use crate::domain::DayKey;
use crate::error::{ErrorResponse, GatewayError};
use crate::timeline::ClockTime;

/// Parses a path segment as a day-key.
fn parse_day(s: &str) -> Result<DayKey, GatewayError> {
    s.parse()
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid day-key: {s:?}")))
}

/// Combines a day-key with a clock time into a UTC timestamp.
fn timestamp_at(day: DayKey, time: ClockTime) -> Result<chrono::DateTime<Utc>, GatewayError> {
    let naive =
        chrono::NaiveTime::from_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)
            .ok_or_else(|| GatewayError::Internal("time conversion failed".to_string()))?;
    Ok(day.date().and_time(naive).and_utc())
}

/// `POST /days` — Open a day for editing.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed times, an inverted flying
/// window, planned availability above the fleet total, or a day that is
/// already open.
#[utoipa::path(
    post,
    path = "/api/v1/days",
    tag = "Days",
    summary = "Open a day",
    description = "Opens a day for editing: reloads its record from the store when one exists, otherwise seeds a fresh record carrying the planned availability at start of day.",
    request_body = OpenDayRequest,
    responses(
        (status = 201, description = "Day opened, full record returned", body = serde_json::Value),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 422, description = "Planned availability above fleet total", body = ErrorResponse),
    )
)]
pub async fn open_day(
    State(state): State<AppState>,
    Json(req): Json<OpenDayRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let start: ClockTime = req.day_flying_start.parse()?;
    let end: ClockTime = req.day_flying_end.parse()?;
    if start >= end {
        return Err(GatewayError::InvalidRequest(format!(
            "flying window start {start} is not before end {end}"
        )));
    }

    let geometry = req.geometry.map(Into::into).unwrap_or_default();
    let record = state
        .availability_service
        .open_day(
            req.date,
            req.total_aircraft,
            req.planned_availability,
            start,
            end,
            geometry,
            Utc::now(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /days` — List open days.
#[utoipa::path(
    get,
    path = "/api/v1/days",
    tag = "Days",
    summary = "List open days",
    description = "Returns a summary of every day currently open in the gateway, sorted by day-key.",
    responses(
        (status = 200, description = "Open day summaries", body = DayListResponse),
    )
)]
pub async fn list_days(State(state): State<AppState>) -> impl IntoResponse {
    let summaries = state.availability_service.list_days().await;
    let data: Vec<DaySummaryDto> = summaries.into_iter().map(Into::into).collect();
    let count = data.len();
    Json(DayListResponse { data, count })
}

/// `GET /days/:date` — Get the full record for a day.
///
/// # Errors
///
/// Returns [`GatewayError::DayNotFound`] if the day is not open.
#[utoipa::path(
    get,
    path = "/api/v1/days/{date}",
    tag = "Days",
    summary = "Get a day's record",
    description = "Returns the full availability record: the snapshot log, flying window, and stored average.",
    params(
        ("date" = String, Path, description = "Day-key, YYYY-MM-DD"),
    ),
    responses(
        (status = 200, description = "Daily availability record", body = serde_json::Value),
        (status = 404, description = "Day not open", body = ErrorResponse),
    )
)]
pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let day = parse_day(&date)?;
    let record = state.availability_service.get_record(day).await?;
    Ok(Json(record))
}

/// `POST /days/:date/snapshots` — Append a snapshot to a day's log.
///
/// # Errors
///
/// Returns [`GatewayError`] on malformed times, an unknown day, or a
/// count above the fleet total.
#[utoipa::path(
    post,
    path = "/api/v1/days/{date}/snapshots",
    tag = "Days",
    summary = "Append a snapshot",
    description = "Appends an observation at the given time of day. Backfills are accepted; the log is re-sorted and the average recomputed.",
    params(
        ("date" = String, Path, description = "Day-key, YYYY-MM-DD"),
    ),
    request_body = AppendSnapshotRequest,
    responses(
        (status = 200, description = "Updated record", body = serde_json::Value),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 404, description = "Day not open", body = ErrorResponse),
        (status = 422, description = "Count above fleet total", body = ErrorResponse),
    )
)]
pub async fn append_snapshot(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<AppendSnapshotRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let day = parse_day(&date)?;
    let time: ClockTime = req.time.parse()?;
    let timestamp = timestamp_at(day, time)?;

    let record = state
        .availability_service
        .append_snapshot(day, timestamp, req.available, req.notes)
        .await?;
    Ok(Json(record))
}

/// `GET /days/:date/average` — Time-weighted average for a day.
///
/// # Errors
///
/// Returns [`GatewayError::DayNotFound`] if the day is not open.
#[utoipa::path(
    get,
    path = "/api/v1/days/{date}/average",
    tag = "Days",
    summary = "Day average",
    description = "Returns the time-weighted average over the day's flying window. With `live=true` the window is truncated at the current time.",
    params(
        ("date" = String, Path, description = "Day-key, YYYY-MM-DD"),
        AverageParams,
    ),
    responses(
        (status = 200, description = "Average availability", body = AverageResponse),
        (status = 404, description = "Day not open", body = ErrorResponse),
    )
)]
pub async fn day_average(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Query(params): Query<AverageParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let day = parse_day(&date)?;
    let average = if params.live {
        state.availability_service.live_average(day, Utc::now()).await?
    } else {
        state.availability_service.average(day).await?
    };
    Ok(Json(AverageResponse {
        date: day,
        average,
        live: params.live,
    }))
}

/// `GET /days/average` — Mean of daily averages over a date range.
#[utoipa::path(
    get,
    path = "/api/v1/days/average",
    tag = "Days",
    summary = "Range average",
    description = "Returns the plain mean of the daily averages of open days in the inclusive range, rounded to one decimal place. 0.0 when no open day falls in the range.",
    params(RangeAverageParams),
    responses(
        (status = 200, description = "Mean of daily averages", body = RangeAverageResponse),
    )
)]
pub async fn range_average(
    State(state): State<AppState>,
    Query(params): Query<RangeAverageParams>,
) -> impl IntoResponse {
    let average = state
        .availability_service
        .range_average(params.from, params.to)
        .await;
    Json(RangeAverageResponse {
        from: params.from,
        to: params.to,
        average,
    })
}

/// `GET /days/:date/segments` — Render plan for a day's timeline.
///
/// # Errors
///
/// Returns [`GatewayError::DayNotFound`] if the day is not open.
#[utoipa::path(
    get,
    path = "/api/v1/days/{date}/segments",
    tag = "Days",
    summary = "Day render plan",
    description = "Returns the step-function render plan: dashed historical segments up to now, vertical connectors on value changes, and a solid draggable segment from now to end of day.",
    params(
        ("date" = String, Path, description = "Day-key, YYYY-MM-DD"),
    ),
    responses(
        (status = 200, description = "Render plan lines", body = SegmentsResponse),
        (status = 404, description = "Day not open", body = ErrorResponse),
    )
)]
pub async fn day_segments(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let day = parse_day(&date)?;
    let lines = state
        .availability_service
        .render_plan(day, Utc::now())
        .await?;
    Ok(Json(SegmentsResponse {
        date: day,
        lines: lines.into_iter().map(SegmentLineDto::from).collect(),
    }))
}

/// Day management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/days", post(open_day).get(list_days))
        .route("/days/average", get(range_average))
        .route("/days/{date}", get(get_day))
        .route("/days/{date}/snapshots", post(append_snapshot))
        .route("/days/{date}/average", get(day_average))
        .route("/days/{date}/segments", get(day_segments))
}
