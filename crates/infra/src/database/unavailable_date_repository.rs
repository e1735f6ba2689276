//! SQLite-backed implementation of the UnavailabilityRepository port.

use async_trait::async_trait;
use callboard_core::schedule::ports::UnavailabilityRepository;
use callboard_domain::{Result, UnavailableDate};
use chrono::Utc;
use rusqlite::{params, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbPool;
use super::placeholders;
use crate::errors::InfraError;

const COLUMNS: &str = "id, actor_id, performance_date_id, synced, calendar_event_id, \
                       all_calendar_event_id, created_at";

/// SQLite implementation of UnavailabilityRepository
pub struct SqliteUnavailableDateRepository {
    pool: DbPool,
}

impl SqliteUnavailableDateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_unavailable_row(row: &Row<'_>) -> rusqlite::Result<UnavailableDate> {
    Ok(UnavailableDate {
        id: row.get(0)?,
        actor_id: row.get(1)?,
        performance_date_id: row.get(2)?,
        synced: row.get(3)?,
        calendar_event_id: row.get(4)?,
        all_calendar_event_id: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[async_trait]
impl UnavailabilityRepository for SqliteUnavailableDateRepository {
    async fn find_by_actor(&self, actor_id: &str) -> Result<Vec<UnavailableDate>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT u.{} FROM unavailable_dates u
                 JOIN performance_dates p ON p.id = u.performance_date_id
                 WHERE u.actor_id = ?1
                 ORDER BY p.date ASC, p.start_time ASC",
                COLUMNS.replace(", ", ", u.")
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params![actor_id], map_unavailable_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn find_by_actor_and_performance(
        &self,
        actor_id: &str,
        performance_date_id: &str,
    ) -> Result<Option<UnavailableDate>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM unavailable_dates
                 WHERE actor_id = ?1 AND performance_date_id = ?2"
            ),
            params![actor_id, performance_date_id],
            map_unavailable_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<UnavailableDate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM unavailable_dates WHERE performance_date_id IN ({})",
                placeholders(ids.len())
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), map_unavailable_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    #[instrument(skip(self, add, remove_ids, casting_ids), fields(
        added = add.len(),
        removed = remove_ids.len(),
        castings_removed = casting_ids.len()
    ))]
    async fn apply_replace(
        &self,
        actor_id: &str,
        add: &[String],
        remove_ids: &[String],
        casting_ids: &[String],
    ) -> Result<Vec<UnavailableDate>> {
        let mut conn = self.pool.get().map_err(InfraError::from)?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        for id in remove_ids {
            tx.execute("DELETE FROM unavailable_dates WHERE id = ?1", params![id])
                .map_err(InfraError::from)?;
        }
        for id in casting_ids {
            tx.execute("DELETE FROM castings WHERE id = ?1", params![id])
                .map_err(InfraError::from)?;
        }

        let now = Utc::now().timestamp();
        let mut created = Vec::with_capacity(add.len());
        for performance_date_id in add {
            let row = UnavailableDate {
                id: Uuid::now_v7().to_string(),
                actor_id: actor_id.to_string(),
                performance_date_id: performance_date_id.clone(),
                synced: false,
                calendar_event_id: None,
                all_calendar_event_id: None,
                created_at: now,
            };
            tx.execute(
                "INSERT INTO unavailable_dates (id, actor_id, performance_date_id, synced, created_at)
                 VALUES (?1, ?2, ?3, 0, ?4)",
                params![row.id, row.actor_id, row.performance_date_id, row.created_at],
            )
            .map_err(InfraError::from)?;
            created.push(row);
        }

        tx.commit().map_err(InfraError::from)?;
        debug!(actor_id, created = created.len(), "replaced unavailability");
        Ok(created)
    }

    async fn find_unsynced(&self) -> Result<Vec<UnavailableDate>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM unavailable_dates WHERE synced = 0"))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([], map_unavailable_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn mark_synced(
        &self,
        id: &str,
        calendar_event_id: Option<&str>,
        all_calendar_event_id: Option<&str>,
    ) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "UPDATE unavailable_dates
             SET synced = 1, calendar_event_id = ?2, all_calendar_event_id = ?3
             WHERE id = ?1",
            params![id, calendar_event_id, all_calendar_event_id],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }
}
