//! # fleetline-gateway
//!
//! REST API and WebSocket gateway for the fleetline aircraft-availability
//! timeline engine.
//!
//! Flight schools track how many aircraft are flyable over the course of
//! a day as a step function: the count holds until the next observed
//! change. This crate keeps one append-only snapshot log per day,
//! computes time-weighted availability averages over the day's flying
//! window, and serves the interactive timeline (drag protocol and render
//! plan) the scheduling dashboard draws.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── AvailabilityService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── DayRegistry (domain/)
//!     ├── Timeline engine (timeline/)
//!     │
//!     └── PostgreSQL record store
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod timeline;
pub mod ws;
