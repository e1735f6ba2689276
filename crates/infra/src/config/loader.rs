//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CALLBOARD_DB_PATH`: Database file path (required)
//! - `CALLBOARD_DB_POOL_SIZE`: Connection pool size (default 4)
//! - `CALLBOARD_HOST` / `CALLBOARD_PORT`: HTTP listener (defaults 127.0.0.1:8080)
//! - `CALLBOARD_ADMIN_PASSWORD`: Admin login password (required)
//! - `CALLBOARD_SESSION_TTL_HOURS`: Session lifetime (default 720)
//! - `CALLBOARD_CALENDAR_ENABLED`: Calendar mirroring on/off (default false)
//! - `CALLBOARD_CALENDAR_CLIENT_ID` / `_CLIENT_SECRET` / `_REFRESH_TOKEN`:
//!   OAuth credentials (required when mirroring is on)
//! - `CALLBOARD_CALENDAR_MALE_LEAD_ID` / `_FEMALE_LEAD_ID` / `_ALL_ACTORS_ID`:
//!   Calendar ids (required when mirroring is on)
//! - `CALLBOARD_RESERVATION_API_KEY`: Bearer key for the crawler (required)
//! - `CALLBOARD_CRAWLER_WEBHOOK_URL`: Crawler trigger webhook (optional)
//! - `CALLBOARD_CRON_SECRET`: Bearer secret for cron endpoints (optional)
//! - `CALLBOARD_MEMO_CLEANUP_CRON`: Cron expression for the in-process job
//! - `CALLBOARD_SCHEDULER_ENABLED`: In-process scheduler on/off (default true)
//!
//! ## File Locations
//! The loader probes `./callboard.toml`, `./config.toml`, `./callboard.json`
//! and `./config.json` in the current working directory.

use std::path::{Path, PathBuf};

use callboard_domain::{
    AuthConfig, CalendarConfig, CallboardError, Config, CronConfig, DatabaseConfig,
    ReservationConfig, Result, ServerConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `CallboardError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `CallboardError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("CALLBOARD_DB_PATH")?;
    let db_pool_size = env_parse("CALLBOARD_DB_POOL_SIZE", 4u32)?;

    let host = std::env::var("CALLBOARD_HOST").unwrap_or_else(|_| "127.0.0.1".into());
    let port = env_parse("CALLBOARD_PORT", 8080u16)?;

    let admin_password = env_var("CALLBOARD_ADMIN_PASSWORD")?;
    let session_ttl_hours = env_parse("CALLBOARD_SESSION_TTL_HOURS", 720u64)?;

    let calendar_enabled = env_bool("CALLBOARD_CALENDAR_ENABLED", false);
    let calendar = if calendar_enabled {
        CalendarConfig {
            enabled: true,
            client_id: env_var("CALLBOARD_CALENDAR_CLIENT_ID")?,
            client_secret: env_var("CALLBOARD_CALENDAR_CLIENT_SECRET")?,
            refresh_token: env_var("CALLBOARD_CALENDAR_REFRESH_TOKEN")?,
            male_lead_calendar_id: env_var("CALLBOARD_CALENDAR_MALE_LEAD_ID")?,
            female_lead_calendar_id: env_var("CALLBOARD_CALENDAR_FEMALE_LEAD_ID")?,
            all_actors_calendar_id: env_var("CALLBOARD_CALENDAR_ALL_ACTORS_ID")?,
        }
    } else {
        CalendarConfig {
            enabled: false,
            client_id: String::new(),
            client_secret: String::new(),
            refresh_token: String::new(),
            male_lead_calendar_id: String::new(),
            female_lead_calendar_id: String::new(),
            all_actors_calendar_id: String::new(),
        }
    };

    let reservation = ReservationConfig {
        api_key: env_var("CALLBOARD_RESERVATION_API_KEY")?,
        crawler_webhook_url: std::env::var("CALLBOARD_CRAWLER_WEBHOOK_URL").ok(),
    };

    let cron = CronConfig {
        secret: std::env::var("CALLBOARD_CRON_SECRET").ok(),
        memo_cleanup_cron: std::env::var("CALLBOARD_MEMO_CLEANUP_CRON")
            .unwrap_or_else(|_| "0 0 15 * * *".into()),
        scheduler_enabled: env_bool("CALLBOARD_SCHEDULER_ENABLED", true),
    };

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        server: ServerConfig { host, port },
        auth: AuthConfig { admin_password, session_ttl_hours },
        calendar,
        reservation,
        cron,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Supports both JSON
/// and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `CallboardError::Config` if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(CallboardError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            CallboardError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| CallboardError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| CallboardError::Config(format!("Invalid TOML config: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| CallboardError::Config(format!("Invalid JSON config: {}", e))),
        other => Err(CallboardError::Config(format!("Unsupported config format: {}", other))),
    }
}

fn probe_config_paths() -> Option<PathBuf> {
    const CANDIDATES: [&str; 4] =
        ["callboard.toml", "config.toml", "callboard.json", "config.json"];

    CANDIDATES.iter().map(PathBuf::from).find(|p| p.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| CallboardError::Config(format!("Missing environment variable: {}", name)))
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|e| CallboardError::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
