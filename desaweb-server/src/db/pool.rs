//! Database connection pool management
//!
//! Uses sqlx MySqlPool with explicit connection limits.

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use crate::config::DbConfig;

/// Create a MySQL connection pool against the configured database.
///
/// # Errors
///
/// Returns an error if the first connection fails (unknown database,
/// bad credentials, unreachable host).
///
/// # Example
///
/// ```ignore
/// let config = DbConfig::from_env()?;
/// let pool = create_pool(&config).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(config.database_options())
        .await
}
