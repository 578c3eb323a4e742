//! Database configuration - environment loading
//!
//! Configuration is loaded from environment variables:
//! - `DB_HOST`: MySQL host (default: localhost)
//! - `DB_PORT`: MySQL port (default: 3306)
//! - `DB_USER`: MySQL user (required)
//! - `DB_PASSWORD`: MySQL password (default: empty)
//! - `DB_NAME`: database to create and use (required)
//! - `DB_MAX_CONNECTIONS`: pool size (default: 5)

use sqlx::mysql::MySqlConnectOptions;

/// Default maximum connections for the pool.
/// Kept low for a single small site.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const DEFAULT_DB_PORT: u16 = 3306;

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {var}: '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
}

impl DbConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("DB_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "DB_PORT",
                value: raw,
            })?,
            None => DEFAULT_DB_PORT,
        };

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                value: raw,
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let database = lookup("DB_NAME")
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::Missing("DB_NAME"))?;

        Ok(Self {
            host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            user: lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            database,
            max_connections,
        })
    }

    /// Connection options for the server itself, no database selected.
    pub fn server_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
    }

    /// Connection options with the configured database selected.
    pub fn database_options(&self) -> MySqlConnectOptions {
        self.server_options().database(&self.database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config =
            DbConfig::from_lookup(lookup(&[("DB_USER", "root"), ("DB_NAME", "desa")])).unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 3306);
        assert_eq!(config.password, "");
        assert_eq!(config.database, "desa");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn missing_database_name_is_rejected() {
        let err = DbConfig::from_lookup(lookup(&[("DB_USER", "root")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_NAME")));

        let err =
            DbConfig::from_lookup(lookup(&[("DB_USER", "root"), ("DB_NAME", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_NAME")));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = DbConfig::from_lookup(lookup(&[
            ("DB_USER", "root"),
            ("DB_NAME", "desa"),
            ("DB_PORT", "not-a-port"),
        ]))
        .unwrap_err();

        assert_eq!(err.to_string(), "invalid value for DB_PORT: 'not-a-port'");
    }
}
