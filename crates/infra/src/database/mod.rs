//! SQLite-backed persistence layer.

pub mod actor_repository;
pub mod casting_repository;
pub mod manager;
pub mod month_override_repository;
pub mod performance_date_repository;
pub mod reservation_status_repository;
pub mod unavailable_date_repository;
pub mod user_repository;

pub use actor_repository::SqliteActorRepository;
pub use casting_repository::SqliteCastingRepository;
pub use manager::{DbConnection, DbManager, DbPool};
pub use month_override_repository::SqliteMonthOverrideRepository;
pub use performance_date_repository::SqlitePerformanceDateRepository;
pub use reservation_status_repository::SqliteReservationStatusRepository;
pub use unavailable_date_repository::SqliteUnavailableDateRepository;
pub use user_repository::SqliteUserRepository;

/// Build a `?1, ?2, …` placeholder list for dynamic IN clauses.
pub(crate) fn placeholders(count: usize) -> String {
    (1..=count).map(|i| format!("?{i}")).collect::<Vec<_>>().join(", ")
}
