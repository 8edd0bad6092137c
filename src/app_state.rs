//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::service::AvailabilityService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Availability service for all business logic.
    pub availability_service: Arc<AvailabilityService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}
