//! Subcommand implementations

pub mod bootstrap;
pub mod serve;

use clap::Args;
use desaweb_server::DbConfig;

/// Database connection arguments shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct DbArgs {
    /// MySQL host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// MySQL port
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    /// MySQL user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// MySQL password
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database to create (if absent) and use
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = desaweb_server::config::DEFAULT_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
}

impl From<DbArgs> for DbConfig {
    fn from(args: DbArgs) -> Self {
        Self {
            host: args.db_host,
            port: args.db_port,
            user: args.db_user,
            password: args.db_password,
            database: args.db_name,
            max_connections: args.db_max_connections,
        }
    }
}
