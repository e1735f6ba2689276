//! Cron-based scheduling for in-process maintenance jobs.

pub mod error;
pub mod memo_cleanup;

pub use error::{SchedulerError, SchedulerResult};
pub use memo_cleanup::{CleanupJob, CleanupScheduler, CleanupSchedulerConfig};
