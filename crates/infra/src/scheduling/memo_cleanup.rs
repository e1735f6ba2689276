//! Cron scheduler for the past-memo cleanup job.
//!
//! Runs a user-supplied job on a fixed cron schedule with an explicit
//! lifecycle: the job handle is tracked, cancellation is explicit, and
//! every asynchronous operation is wrapped in a timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::InfraError;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Trait representing the scheduled cleanup job.
#[async_trait]
pub trait CleanupJob: Send + Sync {
    /// Execute the job.
    async fn run(&self) -> Result<(), InfraError>;
}

/// Configuration for the cleanup scheduler.
#[derive(Debug, Clone)]
pub struct CleanupSchedulerConfig {
    /// Cron expression describing the execution schedule (with seconds).
    pub cron_expression: String,
    /// Timeout applied to a single job execution.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
}

impl Default for CleanupSchedulerConfig {
    fn default() -> Self {
        Self {
            // 15:00 UTC is midnight KST, right after the last show.
            cron_expression: "0 0 15 * * *".into(),
            job_timeout: Duration::from_secs(300),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

/// Cleanup scheduler with explicit lifecycle management.
pub struct CleanupScheduler {
    scheduler: Arc<RwLock<JobScheduler>>,
    config: CleanupSchedulerConfig,
    job_id: Uuid,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    job: Arc<dyn CleanupJob>,
}

impl CleanupScheduler {
    /// Create a scheduler with a custom configuration.
    pub async fn with_config(
        config: CleanupSchedulerConfig,
        job: Arc<dyn CleanupJob>,
    ) -> SchedulerResult<Self> {
        let raw_scheduler = JobScheduler::new()
            .await
            .map_err(|source| SchedulerError::CreationFailed(source.to_string()))?;

        let mut scheduler = Self {
            scheduler: Arc::new(RwLock::new(raw_scheduler)),
            config,
            job_id: Uuid::nil(),
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            job,
        };

        scheduler.job_id = scheduler.register_cleanup_job().await?;
        Ok(scheduler)
    }

    /// Start the scheduler, spawning the monitoring task.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler = self.scheduler.clone();
        let start_timeout = self.config.start_timeout;
        let start_result = tokio::time::timeout(start_timeout, async move {
            let guard = scheduler.write().await;
            guard.start().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?;

        start_result.map_err(|source| SchedulerError::StartFailed(source.to_string()))?;

        let cancel = self.cancellation.clone();
        let handle = tokio::spawn(async move {
            cancel.cancelled().await;
            debug!("cleanup scheduler monitor cancelled");
        });

        self.monitor_handle = Some(handle);
        info!(cron = %self.config.cron_expression, "cleanup scheduler started");
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();

        let scheduler = self.scheduler.clone();
        let stop_timeout = self.config.stop_timeout;
        let stop_result = tokio::time::timeout(stop_timeout, async move {
            let mut guard = scheduler.write().await;
            guard.shutdown().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?;

        stop_result.map_err(|source| SchedulerError::StopFailed(source.to_string()))?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.stop_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })?
                .map_err(|e| SchedulerError::StopFailed(e.to_string()))?;
        }

        info!("cleanup scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Returns true when the monitor task is active.
    pub fn is_running(&self) -> bool {
        self.monitor_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn register_cleanup_job(&mut self) -> SchedulerResult<Uuid> {
        if self.job_id != Uuid::nil() {
            return Ok(self.job_id);
        }

        let cron_expr = self.config.cron_expression.clone();
        let job = self.job.clone();
        let job_timeout = self.config.job_timeout;

        let job_definition = Job::new_async(cron_expr.as_str(), move |_id, _lock| {
            let job = job.clone();

            Box::pin(async move {
                match tokio::time::timeout(job_timeout, job.run()).await {
                    Ok(Ok(())) => debug!("memo cleanup finished"),
                    Ok(Err(err)) => error!(error = ?err, "memo cleanup failed"),
                    Err(_) => {
                        warn!(timeout_secs = job_timeout.as_secs(), "memo cleanup timed out");
                    }
                }
            })
        })
        .map_err(|source| SchedulerError::JobRegistrationFailed(source.to_string()))?;

        let job_id = job_definition.guid();

        let scheduler = self.scheduler.write().await;
        scheduler
            .add(job_definition)
            .await
            .map_err(|source| SchedulerError::JobRegistrationFailed(source.to_string()))?;

        debug!(cron = %cron_expr, job_id = %job_id, "registered memo cleanup job");
        Ok(job_id)
    }
}

impl Drop for CleanupScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("CleanupScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
