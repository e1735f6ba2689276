//! SQLite-backed implementation of the ActorRepository port.

use std::str::FromStr;

use async_trait::async_trait;
use callboard_core::casting::ports::ActorRepository;
use callboard_domain::{Actor, ActorDetail, Result, RoleType};
use rusqlite::{params, Row};
use tracing::{debug, instrument};

use super::manager::DbPool;
use super::placeholders;
use crate::errors::InfraError;

const COLUMNS: &str = "id, name, role_type, calendar_id, created_at, updated_at";

/// SQLite implementation of ActorRepository
pub struct SqliteActorRepository {
    pool: DbPool,
}

impl SqliteActorRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_actor_row(row: &Row<'_>) -> rusqlite::Result<Actor> {
    let role_str: String = row.get(2)?;
    let role_type = RoleType::from_str(&role_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;
    Ok(Actor {
        id: row.get(0)?,
        name: row.get(1)?,
        role_type,
        calendar_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

#[async_trait]
impl ActorRepository for SqliteActorRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Actor>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!("SELECT {COLUMNS} FROM actors WHERE id = ?1"),
            params![id],
            map_actor_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Actor>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM actors WHERE id IN ({})",
                placeholders(ids.len())
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(ids), map_actor_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    async fn find_all(&self) -> Result<Vec<Actor>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {COLUMNS} FROM actors ORDER BY role_type ASC, name ASC"
            ))
            .map_err(InfraError::from)?;
        let rows = stmt
            .query_map([], map_actor_row)
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn list_detailed(&self) -> Result<Vec<ActorDetail>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let mut stmt = conn
            .prepare(
                "SELECT a.id, a.name, a.role_type, a.calendar_id, a.created_at, a.updated_at,
                        u.email, u.name,
                        (SELECT COUNT(*) FROM castings c WHERE c.actor_id = a.id),
                        (SELECT COUNT(*) FROM unavailable_dates d WHERE d.actor_id = a.id)
                 FROM actors a
                 LEFT JOIN users u ON u.actor_id = a.id
                 ORDER BY a.role_type ASC, a.name ASC",
            )
            .map_err(InfraError::from)?;

        let rows = stmt
            .query_map([], |row| {
                let actor = map_actor_row(row)?;
                Ok(ActorDetail {
                    actor,
                    user_email: row.get(6)?,
                    user_name: row.get(7)?,
                    casting_count: row.get(8)?,
                    unavailable_count: row.get(9)?,
                })
            })
            .map_err(InfraError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(InfraError::from)?;

        Ok(rows)
    }

    async fn create(&self, actor: &Actor) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "INSERT INTO actors (id, name, role_type, calendar_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                actor.id,
                actor.name,
                actor.role_type.to_string(),
                actor.calendar_id,
                actor.created_at,
                actor.updated_at
            ],
        )
        .map_err(InfraError::from)?;
        debug!(actor_id = %actor.id, "created actor");
        Ok(())
    }

    async fn update(&self, actor: &Actor) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "UPDATE actors SET name = ?2, role_type = ?3, calendar_id = ?4, updated_at = ?5
             WHERE id = ?1",
            params![
                actor.id,
                actor.name,
                actor.role_type.to_string(),
                actor.calendar_id,
                actor.updated_at
            ],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let deleted =
            conn.execute("DELETE FROM actors WHERE id = ?1", params![id]).map_err(InfraError::from)?;
        debug!(actor_id = id, deleted, "deleted actor");
        Ok(())
    }

    async fn set_calendar_id(&self, id: &str, calendar_id: &str) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute(
            "UPDATE actors SET calendar_id = ?2 WHERE id = ?1",
            params![id, calendar_id],
        )
        .map_err(InfraError::from)?;
        Ok(())
    }
}
