//! Google Calendar integration.
//!
//! Split into a token layer (OAuth refresh-token flow with an in-instance
//! cache), a thin REST client, and the [`gateway`] adapter that implements
//! the core [`callboard_core::CalendarGateway`] port.

pub mod auth;
pub mod client;
pub mod gateway;
pub mod types;

pub use auth::CalendarTokenProvider;
pub use client::GoogleCalendarClient;
pub use gateway::{DisabledCalendarGateway, GoogleCalendarGateway};
