//! Casting assignment: validation, persistence ports, and calendar
//! propagation.

pub mod ports;
pub mod service;

pub use service::{CastingService, NotifyReport};
