//! Blog repository
//!
//! - list: newest first by `created_at`
//! - get_by_title: exact, non-unique match, lowest id wins
//! - delete: zero affected rows is `NotFound`, so of two racing deletes
//!   for the same id exactly one succeeds

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, MySqlPool};

use super::DbError;
use crate::lifecycle::BlogRecords;

const BLOG_COLUMNS: &str = "id, title, image, description, created_at";

/// Blog record from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Blog {
    pub id: i64,
    pub title: String,
    /// File name relative to the blogs asset directory
    pub image: Option<String>,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Values for a new blog row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlog {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

/// Blog repository
pub struct BlogRepo<'a> {
    pool: &'a MySqlPool,
}

impl<'a> BlogRepo<'a> {
    pub fn new(pool: &'a MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Blog>, DbError> {
        let blogs = sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(blogs)
    }

    pub async fn get(&self, id: i64) -> Result<Blog, DbError> {
        sqlx::query_as::<_, Blog>(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("blog", id))
    }

    pub async fn get_by_title(&self, title: &str) -> Result<Blog, DbError> {
        sqlx::query_as::<_, Blog>(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE title = ? ORDER BY id LIMIT 1"
        ))
        .bind(title)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("blog", title))
    }

    /// Insert a blog, returning the new id.
    pub async fn insert(&self, blog: &NewBlog) -> Result<i64, DbError> {
        let result = sqlx::query("INSERT INTO blogs (title, image, description) VALUES (?, ?, ?)")
            .bind(&blog.title)
            .bind(&blog.image)
            .bind(&blog.description)
            .execute(self.pool)
            .await?;

        Ok(result.last_insert_id() as i64)
    }

    /// Image file name of a blog. The outer error is `NotFound` when the
    /// row does not exist; `Ok(None)` means the row has no image.
    pub async fn image_of(&self, id: i64) -> Result<Option<String>, DbError> {
        let row: Option<(Option<String>,)> = sqlx::query_as("SELECT image FROM blogs WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(|(image,)| image)
            .ok_or_else(|| DbError::not_found("blog", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM blogs WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("blog", id));
        }
        Ok(())
    }
}

#[async_trait]
impl BlogRecords for BlogRepo<'_> {
    async fn insert(&self, blog: &NewBlog) -> Result<i64, DbError> {
        BlogRepo::insert(self, blog).await
    }

    async fn image_of(&self, id: i64) -> Result<Option<String>, DbError> {
        BlogRepo::image_of(self, id).await
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        BlogRepo::delete(self, id).await
    }
}
