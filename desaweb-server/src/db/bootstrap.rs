//! Schema bootstrap - database and tables, created if absent
//!
//! Runs once before the server accepts requests:
//!
//! 1. connect to the MySQL server with no database selected (fatal on failure)
//! 2. `CREATE DATABASE IF NOT EXISTS` (logged, never fatal)
//! 3. open the pool against the database (fatal on failure)
//! 4. `CREATE TABLE IF NOT EXISTS` for every table (each logged, never fatal)
//!
//! There is no migration, rollback or retry.

use sqlx::mysql::{MySqlConnection, MySqlPool};
use sqlx::Connection;

use crate::config::DbConfig;
use crate::db::pool::create_pool;

const CREATE_DESA: &str = r#"
    CREATE TABLE IF NOT EXISTS desa (
        id INT AUTO_INCREMENT PRIMARY KEY,
        nama VARCHAR(255) NOT NULL,
        jabatan VARCHAR(255) NOT NULL,
        image VARCHAR(255)
    )
"#;

const CREATE_DESCRIPTION: &str = r#"
    CREATE TABLE IF NOT EXISTS description (
        id INT AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        description TEXT NOT NULL
    )
"#;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INT AUTO_INCREMENT PRIMARY KEY,
        username VARCHAR(255) NOT NULL,
        password VARCHAR(255) NOT NULL
    )
"#;

const CREATE_BLOGS: &str = r#"
    CREATE TABLE IF NOT EXISTS blogs (
        id INT AUTO_INCREMENT PRIMARY KEY,
        title VARCHAR(255) NOT NULL,
        image VARCHAR(255),
        description TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Tables in creation order. No foreign keys, so the order is arbitrary.
pub const TABLES: [(&str, &str); 4] = [
    ("desa", CREATE_DESA),
    ("description", CREATE_DESCRIPTION),
    ("users", CREATE_USERS),
    ("blogs", CREATE_BLOGS),
];

/// Fatal bootstrap failures. Everything else is logged and skipped.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to connect to database server: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to select database '{database}': {source}")]
    SelectDatabase {
        database: String,
        #[source]
        source: sqlx::Error,
    },
}

/// Outcome of one `CREATE TABLE IF NOT EXISTS`
#[derive(Debug)]
pub struct TableStatus {
    pub table: &'static str,
    pub error: Option<sqlx::Error>,
}

impl TableStatus {
    pub fn is_ready(&self) -> bool {
        self.error.is_none()
    }
}

/// Quote a MySQL identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Ensure the database and its tables exist, returning a pool bound to it.
///
/// Table failures do not fail the bootstrap; they are logged by
/// [`ensure_tables`]. Use [`bootstrap_with_report`] to inspect them.
pub async fn bootstrap(config: &DbConfig) -> Result<MySqlPool, BootstrapError> {
    let (pool, _) = bootstrap_with_report(config).await?;
    Ok(pool)
}

/// Same as [`bootstrap`], also returning the per-table outcome.
pub async fn bootstrap_with_report(
    config: &DbConfig,
) -> Result<(MySqlPool, Vec<TableStatus>), BootstrapError> {
    let mut conn = MySqlConnection::connect_with(&config.server_options())
        .await
        .map_err(|e| {
            tracing::error!(host = %config.host, port = config.port, error = %e, "Database connection failed");
            BootstrapError::Connect(e)
        })?;
    tracing::info!(host = %config.host, port = config.port, "Connected to MySQL");

    let create_db = format!(
        "CREATE DATABASE IF NOT EXISTS {}",
        quote_identifier(&config.database)
    );
    match sqlx::raw_sql(&create_db).execute(&mut conn).await {
        Ok(_) => tracing::info!(database = %config.database, "Database is ready"),
        Err(e) => {
            tracing::error!(database = %config.database, error = %e, "Database creation failed")
        }
    }

    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "Server-level connection did not close cleanly");
    }

    let pool = create_pool(config).await.map_err(|e| {
        tracing::error!(database = %config.database, error = %e, "Database selection failed");
        BootstrapError::SelectDatabase {
            database: config.database.clone(),
            source: e,
        }
    })?;

    let report = ensure_tables(&pool).await;
    Ok((pool, report))
}

/// Issue `CREATE TABLE IF NOT EXISTS` for every table.
///
/// Each statement is attempted regardless of earlier failures.
pub async fn ensure_tables(pool: &MySqlPool) -> Vec<TableStatus> {
    let mut report = Vec::with_capacity(TABLES.len());

    for (table, ddl) in TABLES {
        let error = match sqlx::raw_sql(ddl).execute(pool).await {
            Ok(_) => {
                tracing::info!(table, "Table is ready");
                None
            }
            Err(e) => {
                tracing::error!(table, error = %e, "Table creation failed");
                Some(e)
            }
        };
        report.push(TableStatus { table, error });
    }

    report
}
