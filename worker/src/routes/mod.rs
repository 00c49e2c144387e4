//! API route definitions.
//!
//! This module organizes all HTTP routes for the insight worker.

mod error;
mod events;
mod health;
mod insights;

pub use error::ErrorResponse;
pub use events::{events_routes, EventResponse};
pub use health::health_routes;
pub use insights::insights_routes;
