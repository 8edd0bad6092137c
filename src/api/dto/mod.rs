//! Data Transfer Objects for REST request/response serialization.
//!
//! Record bodies are serialized straight from the domain types; the
//! camelCase field names there are an external contract with the
//! dashboard.

pub mod day_dto;
pub mod drag_dto;

pub use day_dto::*;
pub use drag_dto::*;
