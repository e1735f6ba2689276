//! SQLite-backed implementation of the ReservationStatusRepository port.

use async_trait::async_trait;
use callboard_core::reservation::ports::{ReservationStatusRepository, ReservationUpsert};
use callboard_domain::{ReservationStatus, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbPool;
use super::placeholders;
use crate::errors::InfraError;

const COLUMNS: &str = "id, performance_date_id, has_reservation, reservation_name, \
                       reservation_contact, checked_at";

/// SQLite implementation of ReservationStatusRepository
pub struct SqliteReservationStatusRepository {
    pool: DbPool,
}

impl SqliteReservationStatusRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_status_row(row: &Row<'_>) -> rusqlite::Result<ReservationStatus> {
    Ok(ReservationStatus {
        id: row.get(0)?,
        performance_date_id: row.get(1)?,
        has_reservation: row.get(2)?,
        reservation_name: row.get(3)?,
        reservation_contact: row.get(4)?,
        checked_at: row.get(5)?,
    })
}

#[async_trait]
impl ReservationStatusRepository for SqliteReservationStatusRepository {
    async fn find_by_performance_id(
        &self,
        performance_date_id: &str,
    ) -> Result<Option<ReservationStatus>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!("SELECT {COLUMNS} FROM reservation_statuses WHERE performance_date_id = ?1"),
            params![performance_date_id],
            map_status_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_performance_ids(&self, ids: &[String]) -> Result<Vec<ReservationStatus>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM reservation_statuses WHERE performance_date_id IN ({})",
                placeholders(ids.len())
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), map_status_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    #[instrument(skip(self, reservation_name, reservation_contact))]
    async fn upsert(
        &self,
        performance_date_id: &str,
        has_reservation: bool,
        reservation_name: Option<&str>,
        reservation_contact: Option<&str>,
    ) -> Result<ReservationStatus> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let now = Utc::now().timestamp();
        conn.execute(
            "INSERT INTO reservation_statuses
                 (id, performance_date_id, has_reservation, reservation_name, reservation_contact, checked_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(performance_date_id) DO UPDATE SET
                 has_reservation = excluded.has_reservation,
                 reservation_name = COALESCE(excluded.reservation_name, reservation_name),
                 reservation_contact = COALESCE(excluded.reservation_contact, reservation_contact),
                 checked_at = excluded.checked_at",
            params![
                Uuid::now_v7().to_string(),
                performance_date_id,
                has_reservation,
                reservation_name,
                reservation_contact,
                now
            ],
        )
        .map_err(InfraError::from)?;

        let row = conn
            .query_row(
                &format!(
                    "SELECT {COLUMNS} FROM reservation_statuses WHERE performance_date_id = ?1"
                ),
                params![performance_date_id],
                map_status_row,
            )
            .map_err(InfraError::from)?;
        Ok(row)
    }

    #[instrument(skip(self, entries), fields(count = entries.len()))]
    async fn bulk_upsert(&self, entries: &[ReservationUpsert]) -> Result<()> {
        let mut conn = self.pool.get().map_err(InfraError::from)?;
        let tx = conn.transaction().map_err(InfraError::from)?;
        let now = Utc::now().timestamp();

        for entry in entries {
            // Reconciliation rewrites the memo unconditionally so stale
            // contact info cannot survive a slot losing its reservation.
            tx.execute(
                "INSERT INTO reservation_statuses
                     (id, performance_date_id, has_reservation, reservation_name, reservation_contact, checked_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(performance_date_id) DO UPDATE SET
                     has_reservation = excluded.has_reservation,
                     reservation_name = excluded.reservation_name,
                     reservation_contact = excluded.reservation_contact,
                     checked_at = excluded.checked_at",
                params![
                    Uuid::now_v7().to_string(),
                    entry.performance_date_id,
                    entry.has_reservation,
                    entry.reservation_name,
                    entry.reservation_contact,
                    now
                ],
            )
            .map_err(InfraError::from)?;
        }

        tx.commit().map_err(InfraError::from)?;
        debug!(count = entries.len(), "reconciled reservation statuses");
        Ok(())
    }

    async fn find_past_with_memo(&self, date: NaiveDate) -> Result<Vec<ReservationStatus>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT r.{} FROM reservation_statuses r
                 JOIN performance_dates p ON p.id = r.performance_date_id
                 WHERE p.date < ?1
                   AND (r.reservation_name IS NOT NULL OR r.reservation_contact IS NOT NULL)",
                COLUMNS.replace(", ", ", r.")
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params![date.to_string()], map_status_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn clear_memo(&self, id: &str) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "UPDATE reservation_statuses
             SET reservation_name = NULL, reservation_contact = NULL
             WHERE id = ?1",
            params![id],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }
}
