//! Database layer - schema bootstrap, connection pool and repositories
//!
//! # Design Principles
//!
//! - Pool injected through application state - no process-wide handle
//! - One parameterized statement per repository operation
//! - "No matching row" is `DbError::NotFound`, never a sqlx error

pub mod bootstrap;
pub mod pool;
pub mod repos;

pub use bootstrap::{bootstrap, bootstrap_with_report, ensure_tables, BootstrapError, TableStatus};
pub use pool::create_pool;
pub use repos::*;
