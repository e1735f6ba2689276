//! Availability guard: unavailability declarations and their collisions
//! with existing castings.

pub mod service;

pub use service::AvailabilityService;
