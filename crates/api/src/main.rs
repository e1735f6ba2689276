//! Callboard server binary.
//!
//! Boots tracing, loads configuration, wires the application context,
//! starts the in-process memo-cleanup scheduler, and serves the JSON API
//! until a shutdown signal arrives.

use std::sync::Arc;

use callboard_infra::{CleanupScheduler, CleanupSchedulerConfig};
use callboard_lib::jobs::MemoCleanupJob;
use callboard_lib::{build_router, AppContext};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env file, using process environment"),
    }

    let config = callboard_infra::config::load()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let scheduler_enabled = config.cron.scheduler_enabled;
    let memo_cleanup_cron = config.cron.memo_cleanup_cron.clone();

    let ctx = AppContext::new(config)?;

    let mut scheduler = if scheduler_enabled {
        let job = Arc::new(MemoCleanupJob::new(ctx.reservation_service.clone()));
        let scheduler_config = CleanupSchedulerConfig {
            cron_expression: memo_cleanup_cron,
            ..CleanupSchedulerConfig::default()
        };
        let mut scheduler = CleanupScheduler::with_config(scheduler_config, job).await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        info!("in-process scheduler disabled; cron endpoints remain available");
        None
    };

    let router = build_router(ctx);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "callboard listening");

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(err) = scheduler.stop().await {
            warn!(error = %err, "scheduler did not stop cleanly");
        }
    }

    info!("callboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => warn!(error = %err, "failed to listen for shutdown signal"),
    }
}
