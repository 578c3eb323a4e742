//! User repository
//!
//! Plain login records. Passwords are stored and compared as given.

use serde::Serialize;
use sqlx::{FromRow, MySqlPool};

use super::DbError;

/// User record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    /// True when a user with exactly this username and password exists.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, DbError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = ? AND password = ? LIMIT 1")
                .bind(username)
                .bind(password)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.is_some())
    }

    /// Insert a user, returning the new id.
    pub async fn create(&self, username: &str, password: &str) -> Result<i64, DbError> {
        let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(username)
            .bind(password)
            .execute(self.pool)
            .await?;

        Ok(result.last_insert_id() as i64)
    }

    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>("SELECT id, username, password FROM users")
            .fetch_all(self.pool)
            .await?;

        Ok(users)
    }

    /// Delete a user by id, returning the number of rows removed.
    pub async fn delete(&self, id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
