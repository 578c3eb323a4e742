//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool, one repository value per request
//! - One parameterized statement per operation
//! - Missing rows become `DbError::NotFound`, driver failures `DbError::Sqlx`

pub mod blogs;
pub mod desa;
pub mod description;
pub mod users;

pub use blogs::{Blog, BlogRepo, NewBlog};
pub use desa::{DesaRepo, DesaStaff};
pub use description::{Description, DescriptionRepo};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
