//! SQLite-backed implementation of the MonthOverrideRepository port.

use async_trait::async_trait;
use callboard_core::roster::ports::MonthOverrideRepository;
use callboard_domain::{ActorMonthOverride, Result};
use rusqlite::{params, Row};

use super::manager::DbPool;
use crate::errors::InfraError;

const COLUMNS: &str = "id, actor_id, year, month, created_at";

/// SQLite implementation of MonthOverrideRepository
pub struct SqliteMonthOverrideRepository {
    pool: DbPool,
}

impl SqliteMonthOverrideRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_override_row(row: &Row<'_>) -> rusqlite::Result<ActorMonthOverride> {
    Ok(ActorMonthOverride {
        id: row.get(0)?,
        actor_id: row.get(1)?,
        year: row.get(2)?,
        month: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[async_trait]
impl MonthOverrideRepository for SqliteMonthOverrideRepository {
    async fn find(
        &self,
        actor_id: &str,
        year: i32,
        month: u32,
    ) -> Result<Option<ActorMonthOverride>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM actor_month_overrides
                 WHERE actor_id = ?1 AND year = ?2 AND month = ?3"
            ),
            params![actor_id, year, month],
            map_override_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn create(&self, row: &ActorMonthOverride) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO actor_month_overrides (id, actor_id, year, month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![row.id, row.actor_id, row.year, row.month, row.created_at],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute("DELETE FROM actor_month_overrides WHERE id = ?1", params![id])
            .map_err(InfraError::from)?;
        Ok(())
    }

    async fn find_actor_ids(&self, year: i32, month: u32) -> Result<Vec<String>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(
                "SELECT actor_id FROM actor_month_overrides WHERE year = ?1 AND month = ?2",
            )
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(params![year, month], |row| row.get::<_, String>(0))
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }
}
