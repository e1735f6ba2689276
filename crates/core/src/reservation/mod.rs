//! Reservation ingestion: crawler-fed booking data and memo lifecycle.

pub mod ports;
pub mod service;

pub use service::{
    BookingDetail, BookingOutcome, CleanupReport, ReservationService, ReservationSyncReport,
};
