//! Drag protocol DTOs: begin, move, release.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DayKey;

/// Request body for the drag endpoints. The client reports the pointer's
/// vertical position in grid pixels; the server owns the mapping to
/// aircraft counts.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DragRequest {
    /// Pointer y coordinate in grid pixels.
    pub pointer_y: f64,
}

/// Response body for `POST /days/{date}/drag/begin` and `/drag/move`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DragPreviewResponse {
    /// Day-key.
    #[schema(value_type = String)]
    pub date: DayKey,
    /// Fractional availability under the pointer, clamped to the fleet.
    pub preview: f64,
}

/// Response body for `POST /days/{date}/drag/release`.
#[derive(Debug, Serialize, ToSchema)]
pub struct DragReleaseResponse {
    /// Day-key.
    #[schema(value_type = String)]
    pub date: DayKey,
    /// Pointer value snapped to the nearest whole aircraft.
    pub snapped: u32,
    /// Whether a snapshot was committed (`false` when the value did not
    /// change).
    pub committed: bool,
}
