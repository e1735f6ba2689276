//! SQLite-backed implementation of the CastingRepository port.

use std::str::FromStr;

use async_trait::async_trait;
use callboard_core::casting::ports::{CastingRepository, CastingWrite};
use callboard_domain::{Casting, Result, RoleType};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbPool;
use super::placeholders;
use crate::errors::InfraError;

const COLUMNS: &str = "id, performance_date_id, actor_id, role_type, synced, \
                       calendar_event_id, all_calendar_event_id, created_at, updated_at";

/// SQLite implementation of CastingRepository
pub struct SqliteCastingRepository {
    pool: DbPool,
}

impl SqliteCastingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_casting_row(row: &Row<'_>) -> rusqlite::Result<Casting> {
    let role_str: String = row.get(3)?;
    let role_type = RoleType::from_str(&role_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;
    Ok(Casting {
        id: row.get(0)?,
        performance_date_id: row.get(1)?,
        actor_id: row.get(2)?,
        role_type,
        synced: row.get(4)?,
        calendar_event_id: row.get(5)?,
        all_calendar_event_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn upsert_casting(conn: &Connection, performance_date_id: &str, actor_id: &str, role_type: RoleType) -> rusqlite::Result<()> {
    let now = Utc::now().timestamp();
    conn.execute(
        "INSERT INTO castings (id, performance_date_id, actor_id, role_type, synced, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
         ON CONFLICT(performance_date_id, role_type) DO UPDATE SET
             actor_id = excluded.actor_id,
             synced = 0,
             calendar_event_id = NULL,
             all_calendar_event_id = NULL,
             updated_at = excluded.updated_at",
        params![
            Uuid::now_v7().to_string(),
            performance_date_id,
            actor_id,
            role_type.to_string(),
            now
        ],
    )?;
    Ok(())
}

fn upsert_memo(
    conn: &Connection,
    performance_date_id: &str,
    name: Option<&str>,
    contact: Option<&str>,
) -> rusqlite::Result<()> {
    let now = Utc::now().timestamp();
    // A memo implies a live reservation; absent fields keep their stored
    // values.
    conn.execute(
        "INSERT INTO reservation_statuses
             (id, performance_date_id, has_reservation, reservation_name, reservation_contact, checked_at)
         VALUES (?1, ?2, 1, ?3, ?4, ?5)
         ON CONFLICT(performance_date_id) DO UPDATE SET
             has_reservation = 1,
             reservation_name = COALESCE(excluded.reservation_name, reservation_name),
             reservation_contact = COALESCE(excluded.reservation_contact, reservation_contact),
             checked_at = excluded.checked_at",
        params![Uuid::now_v7().to_string(), performance_date_id, name, contact, now],
    )?;
    Ok(())
}

#[async_trait]
impl CastingRepository for SqliteCastingRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Casting>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!("SELECT {COLUMNS} FROM castings WHERE id = ?1"),
            params![id],
            map_casting_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Casting>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM castings WHERE id IN ({})",
                placeholders(ids.len())
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), map_casting_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn find_all(&self) -> Result<Vec<Casting>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT c.{} FROM castings c
                 JOIN performance_dates p ON p.id = c.performance_date_id
                 ORDER BY p.date ASC, p.start_time ASC",
                COLUMNS.replace(", ", ", c.")
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([], map_casting_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn find_by_slot_and_role(
        &self,
        performance_date_id: &str,
        role_type: RoleType,
    ) -> Result<Option<Casting>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM castings
                 WHERE performance_date_id = ?1 AND role_type = ?2"
            ),
            params![performance_date_id, role_type.to_string()],
            map_casting_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<Casting>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM castings WHERE performance_date_id IN ({})",
                placeholders(ids.len())
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), map_casting_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn find_by_actor_and_performance_ids(
        &self,
        actor_id: &str,
        ids: &[String],
    ) -> Result<Vec<Casting>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.pool.get().map_err(InfraError::from)?;
        // actor_id binds after the IN list.
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM castings
                 WHERE performance_date_id IN ({}) AND actor_id = ?{}",
                placeholders(ids.len()),
                ids.len() + 1
            ))
            .map_err(InfraError::from)?;
        let params_vec: Vec<&str> =
            ids.iter().map(String::as_str).chain(std::iter::once(actor_id)).collect();
        let rows = stmt
            .query_map(rusqlite::params_from_iter(params_vec), map_casting_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn upsert(
        &self,
        performance_date_id: &str,
        actor_id: &str,
        role_type: RoleType,
    ) -> Result<Casting> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        upsert_casting(&conn, performance_date_id, actor_id, role_type)
            .map_err(InfraError::from)?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM castings
                     WHERE performance_date_id = ?1 AND role_type = ?2"
                ),
                params![performance_date_id, role_type.to_string()],
                map_casting_row,
            )
            .map_err(InfraError::from)?;

        debug!(casting_id = %row.id, "upserted casting");
        Ok(row)
    }

    async fn delete_by_slot_and_role(
        &self,
        performance_date_id: &str,
        role_type: RoleType,
    ) -> Result<Vec<Casting>> {
        let mut conn = self.pool.get().map_err(InfraError::from)?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        let removed = {
            let mut stmt = tx
                .prepare(&format!(
                    "SELECT {COLUMNS} FROM castings
                     WHERE performance_date_id = ?1 AND role_type = ?2"
                ))
                .map_err(InfraError::from)?;
            let rows = stmt
                .query_map(
                    params![performance_date_id, role_type.to_string()],
                    map_casting_row,
                )
                .map_err(InfraError::from)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(InfraError::from)?;
            rows
        };

        tx.execute(
            "DELETE FROM castings WHERE performance_date_id = ?1 AND role_type = ?2",
            params![performance_date_id, role_type.to_string()],
        )
        .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;
        Ok(removed)
    }

    #[instrument(skip(self, writes), fields(count = writes.len()))]
    async fn apply_writes(&self, writes: &[CastingWrite]) -> Result<()> {
        let mut conn = self.pool.get().map_err(InfraError::from)?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        for write in writes {
            match write {
                CastingWrite::Assign { performance_date_id, actor_id, role_type } => {
                    upsert_casting(&tx, performance_date_id, actor_id, *role_type)
                        .map_err(InfraError::from)?;
                }
                CastingWrite::Unassign { performance_date_id, role_type } => {
                    tx.execute(
                        "DELETE FROM castings WHERE performance_date_id = ?1 AND role_type = ?2",
                        params![performance_date_id, role_type.to_string()],
                    )
                    .map_err(InfraError::from)?;
                }
                CastingWrite::Memo { performance_date_id, name, contact } => {
                    upsert_memo(&tx, performance_date_id, name.as_deref(), contact.as_deref())
                        .map_err(InfraError::from)?;
                }
            }
        }

        tx.commit().map_err(InfraError::from)?;
        debug!(count = writes.len(), "applied casting writes");
        Ok(())
    }

    async fn mark_synced(
        &self,
        id: &str,
        calendar_event_id: Option<&str>,
        all_calendar_event_id: Option<&str>,
    ) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "UPDATE castings SET synced = 1, calendar_event_id = ?2, all_calendar_event_id = ?3,
                 updated_at = ?4
             WHERE id = ?1",
            params![id, calendar_event_id, all_calendar_event_id, Utc::now().timestamp()],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    async fn find_unsynced(&self) -> Result<Vec<Casting>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!("SELECT {COLUMNS} FROM castings WHERE synced = 0"))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([], map_casting_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn find_male_leads_with_events_after(&self, date: NaiveDate) -> Result<Vec<Casting>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT c.{} FROM castings c
                 JOIN performance_dates p ON p.id = c.performance_date_id
                 WHERE c.role_type = 'MALE_LEAD'
                   AND c.calendar_event_id IS NOT NULL
                   AND p.date > ?1",
                COLUMNS.replace(", ", ", c.")
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params![date.to_string()], map_casting_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }
}
