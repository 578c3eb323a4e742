//! Village staff repository (read-only)

use serde::Serialize;
use sqlx::{FromRow, MySqlPool};

use super::DbError;

/// Village staff record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DesaStaff {
    pub id: i64,
    pub nama: String,
    pub jabatan: String,
    pub image: Option<String>,
}

/// Village staff repository
pub struct DesaRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> DesaRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<DesaStaff>, DbError> {
        let rows = sqlx::query_as::<_, DesaStaff>("SELECT id, nama, jabatan, image FROM desa")
            .fetch_all(self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<DesaStaff, DbError> {
        sqlx::query_as::<_, DesaStaff>("SELECT id, nama, jabatan, image FROM desa WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("desa", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DbConfig;

    #[tokio::test]
    #[ignore = "requires database"]
    async fn get_missing_is_not_found() {
        let config = DbConfig::from_env().expect("DB_* variables required");
        let pool = crate::db::bootstrap(&config).await.expect("bootstrap");

        let err = DesaRepo::new(&pool).get(i32::MAX as i64).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
