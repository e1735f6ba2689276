//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use callboard_core::calendar_ports::CalendarGateway;
use callboard_core::casting::ports::{ActorRepository, CastingRepository, UserRepository};
use callboard_core::reservation::ports::{CrawlerTrigger, ReservationStatusRepository};
use callboard_core::roster::ports::MonthOverrideRepository;
use callboard_core::schedule::ports::{PerformanceDateRepository, UnavailabilityRepository};
use callboard_core::{
    AvailabilityService, CalendarSyncService, CastingService, ReservationService, RosterService,
    ScheduleService,
};
use callboard_domain::{Config, Result};
use callboard_infra::{
    CalendarTokenProvider, DbManager, DisabledCalendarGateway, GoogleCalendarClient,
    GoogleCalendarGateway, SqliteActorRepository, SqliteCastingRepository,
    SqliteMonthOverrideRepository, SqlitePerformanceDateRepository,
    SqliteReservationStatusRepository, SqliteUnavailableDateRepository, SqliteUserRepository,
    WebhookCrawlerTrigger,
};
use tracing::info;

use crate::auth::SessionStore;

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,

    // Repositories
    pub actors: Arc<dyn ActorRepository>,
    pub users: Arc<dyn UserRepository>,
    pub castings: Arc<dyn CastingRepository>,
    pub performances: Arc<dyn PerformanceDateRepository>,
    pub unavailability: Arc<dyn UnavailabilityRepository>,
    pub reservations: Arc<dyn ReservationStatusRepository>,
    pub overrides: Arc<dyn MonthOverrideRepository>,

    // Services
    pub schedule_service: Arc<ScheduleService>,
    pub casting_service: Arc<CastingService>,
    pub availability_service: Arc<AvailabilityService>,
    pub reservation_service: Arc<ReservationService>,
    pub roster_service: Arc<RosterService>,
    pub sync_service: Arc<CalendarSyncService>,

    // Sessions
    pub sessions: Arc<SessionStore>,
}

impl AppContext {
    /// Wire the full dependency graph and run migrations.
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let pool = db.pool().clone();
        let actors: Arc<dyn ActorRepository> = Arc::new(SqliteActorRepository::new(pool.clone()));
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let castings: Arc<dyn CastingRepository> =
            Arc::new(SqliteCastingRepository::new(pool.clone()));
        let performances: Arc<dyn PerformanceDateRepository> =
            Arc::new(SqlitePerformanceDateRepository::new(pool.clone()));
        let unavailability: Arc<dyn UnavailabilityRepository> =
            Arc::new(SqliteUnavailableDateRepository::new(pool.clone()));
        let reservations: Arc<dyn ReservationStatusRepository> =
            Arc::new(SqliteReservationStatusRepository::new(pool.clone()));
        let overrides: Arc<dyn MonthOverrideRepository> =
            Arc::new(SqliteMonthOverrideRepository::new(pool));

        let calendar: Arc<dyn CalendarGateway> = if config.calendar.enabled {
            let http = reqwest::Client::new();
            let tokens = Arc::new(CalendarTokenProvider::new(http.clone(), &config.calendar));
            let client = GoogleCalendarClient::new(http, tokens);
            info!("calendar mirroring enabled");
            Arc::new(GoogleCalendarGateway::new(client, config.calendar.clone()))
        } else {
            info!("calendar mirroring disabled; rows will stay unsynced");
            Arc::new(DisabledCalendarGateway)
        };

        let crawler: Option<Arc<dyn CrawlerTrigger>> = config
            .reservation
            .crawler_webhook_url
            .clone()
            .map(|url| WebhookCrawlerTrigger::new(url).map(|t| Arc::new(t) as _))
            .transpose()?;

        let schedule_service = Arc::new(ScheduleService::new(performances.clone()));
        let casting_service = Arc::new(CastingService::new(
            actors.clone(),
            castings.clone(),
            performances.clone(),
            unavailability.clone(),
            reservations.clone(),
            users.clone(),
            calendar.clone(),
        ));
        let availability_service = Arc::new(AvailabilityService::new(
            actors.clone(),
            castings.clone(),
            performances.clone(),
            unavailability.clone(),
            calendar.clone(),
            casting_service.clone(),
        ));
        let reservation_service = Arc::new(ReservationService::new(
            performances.clone(),
            castings.clone(),
            reservations.clone(),
            schedule_service.clone(),
            casting_service.clone(),
            crawler,
        ));
        let roster_service = Arc::new(RosterService::new(
            actors.clone(),
            users.clone(),
            overrides.clone(),
            calendar.clone(),
        ));
        let sync_service = Arc::new(CalendarSyncService::new(
            actors.clone(),
            castings.clone(),
            performances.clone(),
            unavailability.clone(),
            calendar,
            casting_service.clone(),
        ));

        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            config.auth.session_ttl_hours * 3600,
        )));

        Ok(Arc::new(Self {
            config,
            db,
            actors,
            users,
            castings,
            performances,
            unavailability,
            reservations,
            overrides,
            schedule_service,
            casting_service,
            availability_service,
            reservation_service,
            roster_service,
            sync_service,
            sessions,
        }))
    }
}
