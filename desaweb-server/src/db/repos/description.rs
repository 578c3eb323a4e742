//! Description repository
//!
//! Intended as a single site-wide record, but nothing enforces that; reads
//! return every row.

use serde::Serialize;
use sqlx::{FromRow, MySqlPool};

use super::DbError;

/// Description record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Description {
    pub id: i64,
    pub title: String,
    pub description: String,
}

/// Description repository
pub struct DescriptionRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> DescriptionRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Description>, DbError> {
        let rows = sqlx::query_as::<_, Description>("SELECT id, title, description FROM description")
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    /// Overwrite title and description, returning the number of rows matched.
    pub async fn update(&self, id: i64, title: &str, description: &str) -> Result<u64, DbError> {
        let result = sqlx::query("UPDATE description SET title = ?, description = ? WHERE id = ?")
            .bind(title)
            .bind(description)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
