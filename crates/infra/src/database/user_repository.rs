//! SQLite-backed implementation of the UserRepository port.

use std::str::FromStr;

use async_trait::async_trait;
use callboard_core::casting::ports::UserRepository;
use callboard_domain::{Result, Role, User};
use rusqlite::{params, Row};
use tracing::instrument;

use super::manager::DbPool;
use crate::errors::InfraError;

const COLUMNS: &str = "id, email, name, role, actor_id, password_hash, created_at";

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let role_str: String = row.get(3)?;
    let role = Role::from_str(&role_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        role,
        actor_id: row.get(4)?,
        password_hash: row.get(5)?,
        created_at: row.get(6)?,
    })
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            map_user_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            map_user_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn find_by_actor(&self, actor_id: &str) -> Result<Option<User>> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        let result = conn.query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE actor_id = ?1"),
            params![actor_id],
            map_user_row,
        );
        match result {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    async fn update_email(&self, user_id: &str, email: Option<&str>) -> Result<()> {
        let conn = self.pool.get().map_err(InfraError::from)?;
        conn.execute("UPDATE users SET email = ?2 WHERE id = ?1", params![user_id, email])
            .map_err(InfraError::from)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn link_actor(&self, user_id: &str, actor_id: &str) -> Result<()> {
        let mut conn = self.pool.get().map_err(InfraError::from)?;
        let tx = conn.transaction().map_err(InfraError::from)?;

        tx.execute("UPDATE users SET actor_id = NULL WHERE actor_id = ?1", params![actor_id])
            .map_err(InfraError::from)?;
        tx.execute(
            "UPDATE users SET actor_id = ?2, role = 'ACTOR' WHERE id = ?1",
            params![user_id, actor_id],
        )
        .map_err(InfraError::from)?;

        tx.commit().map_err(InfraError::from)?;
        Ok(())
    }
}
