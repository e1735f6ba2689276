//! SQLite-backed implementation of the PerformanceDateRepository port.

use std::str::FromStr;

use async_trait::async_trait;
use callboard_core::schedule::ports::PerformanceDateRepository;
use callboard_domain::utils::time::{month_end_exclusive, month_start};
use callboard_domain::{
    CallboardError, NewPerformanceSlot, PerformanceDate, Result,
};
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::manager::DbPool;
use super::placeholders;
use crate::errors::InfraError;

const COLUMNS: &str = "id, date, start_time, end_time, label, created_at";

/// SQLite implementation of PerformanceDateRepository
pub struct SqlitePerformanceDateRepository {
    pool: DbPool,
}

impl SqlitePerformanceDateRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_performance_row(row: &Row<'_>) -> rusqlite::Result<PerformanceDate> {
    let date_str: String = row.get(1)?;
    let date = NaiveDate::from_str(&date_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(PerformanceDate {
        id: row.get(0)?,
        date,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        label: row.get(4)?,
        created_at: row.get(5)?,
    })
}

#[async_trait]
impl PerformanceDateRepository for SqlitePerformanceDateRepository {
    #[instrument(skip(self))]
    async fn find_by_month(&self, year: i32, month: u32) -> Result<Vec<PerformanceDate>> {
        let (start, end) = match (month_start(year, month), month_end_exclusive(year, month)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(CallboardError::InvalidInput(format!(
                    "invalid year/month: {}-{}",
                    year, month
                )))
            }
        };

        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM performance_dates
                 WHERE date >= ?1 AND date < ?2
                 ORDER BY date ASC, start_time ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![start.to_string(), end.to_string()], map_performance_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<PerformanceDate>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM performance_dates WHERE date = ?1 ORDER BY start_time ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(params![date.to_string()], map_performance_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PerformanceDate>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!("SELECT {COLUMNS} FROM performance_dates WHERE id = ?1"),
            params![id],
            map_performance_row,
        );

        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<PerformanceDate>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM performance_dates WHERE id IN ({})",
                placeholders(ids.len())
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), map_performance_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }

    async fn find_all(&self) -> Result<Vec<PerformanceDate>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM performance_dates ORDER BY date ASC, start_time ASC"
            ))
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map([], map_performance_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }

    #[instrument(skip(self, slots), fields(count = slots.len()))]
    async fn insert_slots(&self, slots: &[NewPerformanceSlot]) -> Result<()> {
        if slots.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().map_err(InfraError::from)?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        let now = Utc::now().timestamp();
        for slot in slots {
            // OR IGNORE: a concurrent generator may have won the race for
            // this (date, start_time) pair.
            tx.execute(
                "INSERT OR IGNORE INTO performance_dates (id, date, start_time, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    Uuid::now_v7().to_string(),
                    slot.date.to_string(),
                    slot.start_time,
                    now
                ],
            )
            .map_err(InfraError::from)?;
        }

        tx.commit().map_err(InfraError::from)?;
        debug!(count = slots.len(), "inserted performance slots");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::database::DbManager;

    fn setup() -> (DbPool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let manager = DbManager::new(temp_dir.path().join("test.db"), 2).unwrap();
        manager.run_migrations().unwrap();
        (manager.pool().clone(), temp_dir)
    }

    #[tokio::test]
    async fn insert_and_query_month() {
        let (pool, _tmp) = setup();
        let repo = SqlitePerformanceDateRepository::new(pool);

        let slots = vec![
            NewPerformanceSlot {
                date: NaiveDate::from_ymd_opt(2027, 3, 2).unwrap(),
                start_time: "13:00".into(),
            },
            NewPerformanceSlot {
                date: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
                start_time: "10:45".into(),
            },
        ];
        repo.insert_slots(&slots).await.unwrap();

        let rows = repo.find_by_month(2027, 3).await.unwrap();
        assert_eq!(rows.len(), 2);
        // Sorted by date then start time.
        assert_eq!(rows[0].start_time, "10:45");
        assert_eq!(rows[1].start_time, "13:00");
    }

    #[tokio::test]
    async fn duplicate_slots_are_ignored() {
        let (pool, _tmp) = setup();
        let repo = SqlitePerformanceDateRepository::new(pool);

        let slot = NewPerformanceSlot {
            date: NaiveDate::from_ymd_opt(2027, 3, 1).unwrap(),
            start_time: "10:45".into(),
        };
        repo.insert_slots(&[slot.clone()]).await.unwrap();
        repo.insert_slots(&[slot]).await.unwrap();

        let rows = repo.find_by_month(2027, 3).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn find_by_date_filters() {
        let (pool, _tmp) = setup();
        let repo = SqlitePerformanceDateRepository::new(pool);

        let march_first = NaiveDate::from_ymd_opt(2027, 3, 1).unwrap();
        repo.insert_slots(&[
            NewPerformanceSlot { date: march_first, start_time: "10:45".into() },
            NewPerformanceSlot {
                date: NaiveDate::from_ymd_opt(2027, 3, 2).unwrap(),
                start_time: "10:45".into(),
            },
        ])
        .await
        .unwrap();

        let rows = repo.find_by_date(march_first).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, march_first);
    }

    #[tokio::test]
    async fn missing_id_is_none() {
        let (pool, _tmp) = setup();
        let repo = SqlitePerformanceDateRepository::new(pool);

        assert!(repo.find_by_id("nope").await.unwrap().is_none());
    }
}
