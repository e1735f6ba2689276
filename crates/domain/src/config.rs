//! Configuration structures
//!
//! Plain data carried from the loader (infra) into the application context.
//! All sections are serde-deserializable so the loader can read them from
//! TOML or JSON files as well as the environment.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub calendar: CalendarConfig,
    pub reservation: ReservationConfig,
    pub cron: CronConfig,
}

/// SQLite database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080 }
    }
}

/// Session / login settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Password that grants an ADMIN session.
    pub admin_password: String,
    /// Session lifetime in hours.
    pub session_ttl_hours: u64,
}

/// Google Calendar mirroring settings
///
/// When `enabled` is false the gateway is replaced with a no-op and every
/// row simply stays unsynced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub enabled: bool,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    /// Fallback calendar for MALE_LEAD castings when the actor has no
    /// personal calendar.
    pub male_lead_calendar_id: String,
    /// Fallback calendar for FEMALE_LEAD castings.
    pub female_lead_calendar_id: String,
    /// Aggregate calendar mirroring every actor's events.
    pub all_actors_calendar_id: String,
}

/// Reservation-crawler integration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Static bearer key the crawler presents on ingestion endpoints.
    pub api_key: String,
    /// Webhook that triggers a crawler run; optional.
    pub crawler_webhook_url: Option<String>,
}

/// Scheduled-job settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronConfig {
    /// Bearer secret protecting the cron HTTP endpoints. When unset the
    /// endpoints accept unauthenticated calls (local development).
    pub secret: Option<String>,
    /// Cron expression for the in-process past-memo cleanup job.
    pub memo_cleanup_cron: String,
    /// Whether the in-process scheduler runs at all.
    pub scheduler_enabled: bool,
}
