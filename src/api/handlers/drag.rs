//! Drag protocol handlers: begin, move, release.
//!
//! The drag endpoints mirror the pointer lifecycle on the dashboard. The
//! server keeps the fractional preview so every client rendering the day
//! sees the same line, and commits a snapshot only on a release that
//! changed the value.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;

use crate::api::dto::{DragPreviewResponse, DragReleaseResponse, DragRequest};
use crate::app_state::AppState;
use crate::domain::DayKey;
use crate::error::{ErrorResponse, GatewayError};

fn parse_day(s: &str) -> Result<DayKey, GatewayError> {
    s.parse()
        .map_err(|_| GatewayError::InvalidRequest(format!("invalid day-key: {s:?}")))
}

/// `POST /days/:date/drag/begin` — Capture the pointer on the current line.
///
/// # Errors
///
/// Returns [`GatewayError::DayNotFound`] if the day is not open.
#[utoipa::path(
    post,
    path = "/api/v1/days/{date}/drag/begin",
    tag = "Drag",
    summary = "Begin a drag",
    description = "Captures the pointer on the day's current-value line and returns the initial fractional preview.",
    params(
        ("date" = String, Path, description = "Day-key, YYYY-MM-DD"),
    ),
    request_body = DragRequest,
    responses(
        (status = 200, description = "Drag started", body = DragPreviewResponse),
        (status = 404, description = "Day not open", body = ErrorResponse),
    )
)]
pub async fn drag_begin(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<DragRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let day = parse_day(&date)?;
    let preview = state
        .availability_service
        .drag_begin(day, req.pointer_y)
        .await?;
    Ok(Json(DragPreviewResponse { date: day, preview }))
}

/// `POST /days/:date/drag/move` — Update the drag preview.
///
/// # Errors
///
/// Returns [`GatewayError::DragNotActive`] if no drag is in progress.
#[utoipa::path(
    post,
    path = "/api/v1/days/{date}/drag/move",
    tag = "Drag",
    summary = "Move the pointer",
    description = "Recomputes the fractional preview from the latest pointer position. Moves without an active drag are rejected.",
    params(
        ("date" = String, Path, description = "Day-key, YYYY-MM-DD"),
    ),
    request_body = DragRequest,
    responses(
        (status = 200, description = "Preview updated", body = DragPreviewResponse),
        (status = 404, description = "Day not open", body = ErrorResponse),
        (status = 409, description = "No drag in progress", body = ErrorResponse),
    )
)]
pub async fn drag_move(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<DragRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let day = parse_day(&date)?;
    let preview = state
        .availability_service
        .drag_move(day, req.pointer_y)
        .await?;
    Ok(Json(DragPreviewResponse { date: day, preview }))
}

/// `POST /days/:date/drag/release` — End the drag and commit if changed.
///
/// # Errors
///
/// Returns [`GatewayError::DragNotActive`] if no drag is in progress.
#[utoipa::path(
    post,
    path = "/api/v1/days/{date}/drag/release",
    tag = "Drag",
    summary = "Release the pointer",
    description = "Snaps the pointer to the nearest whole aircraft, clamped to the fleet. A snapshot is committed only when the snapped value differs from the current availability.",
    params(
        ("date" = String, Path, description = "Day-key, YYYY-MM-DD"),
    ),
    request_body = DragRequest,
    responses(
        (status = 200, description = "Drag ended", body = DragReleaseResponse),
        (status = 404, description = "Day not open", body = ErrorResponse),
        (status = 409, description = "No drag in progress", body = ErrorResponse),
    )
)]
pub async fn drag_release(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(req): Json<DragRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let day = parse_day(&date)?;
    let outcome = state
        .availability_service
        .drag_release(day, req.pointer_y, Utc::now())
        .await?;
    Ok(Json(DragReleaseResponse {
        date: day,
        snapped: outcome.snapped,
        committed: outcome.committed,
    }))
}

/// Drag protocol routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/days/{date}/drag/begin", post(drag_begin))
        .route("/days/{date}/drag/move", post(drag_move))
        .route("/days/{date}/drag/release", post(drag_release))
}
