//! Calendar reconciliation: retries unsynced rows and scrubs future event
//! descriptions.

pub mod service;

pub use service::{CalendarSyncService, CategoryReport, FutureCleanupReport, SyncReport};
