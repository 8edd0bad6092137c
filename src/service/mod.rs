//! Service layer: business logic orchestration.
//!
//! [`AvailabilityService`] coordinates day operations, delegates
//! computation to the timeline engine, and emits events through the
//! [`super::domain::EventBus`].

pub mod availability_service;

pub use availability_service::AvailabilityService;
