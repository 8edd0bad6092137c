//! fleetline-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints, an
//! optional PostgreSQL record store, and the clock-tick broadcast task.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use chrono::Utc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use fleetline_gateway::api;
use fleetline_gateway::app_state::AppState;
use fleetline_gateway::config::GatewayConfig;
use fleetline_gateway::domain::{AvailabilityEvent, DayRegistry, EventBus};
use fleetline_gateway::persistence::PostgresStore;
use fleetline_gateway::service::AvailabilityService;
use fleetline_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting fleetline-gateway");

    // Optional record store
    let store = if config.persistence_enabled {
        match PostgresStore::connect(&config).await {
            Ok(store) => {
                tracing::info!("record store connected");
                Some(store)
            }
            Err(e) => {
                tracing::warn!(error = %e, "record store unavailable, running in-memory");
                None
            }
        }
    } else {
        None
    };

    // Build domain layer
    let registry = Arc::new(DayRegistry::new());
    let event_bus = EventBus::new(config.event_bus_capacity);

    // Build service layer
    let availability_service = Arc::new(AvailabilityService::new(
        registry,
        event_bus.clone(),
        store.clone(),
    ));

    // Periodic clock ticks so dashboards advance their "now" marker.
    let tick_bus = event_bus.clone();
    let tick_secs = config.clock_tick_secs.max(1);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(tick_secs));
        loop {
            interval.tick().await;
            let _ = tick_bus.publish(AvailabilityEvent::ClockTick {
                timestamp: Utc::now(),
            });
        }
    });

    // Periodic cleanup of stale stored records.
    if let Some(store) = store
        && config.cleanup_after_days > 0
    {
        let after_days = config.cleanup_after_days;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(24 * 60 * 60));
            loop {
                interval.tick().await;
                match store.delete_older_than(after_days).await {
                    Ok(0) => {}
                    Ok(n) => tracing::info!(deleted = n, "cleaned up stale records"),
                    Err(e) => tracing::warn!(error = %e, "record cleanup failed"),
                }
            }
        });
    }

    // Build application state
    let app_state = AppState {
        availability_service,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
