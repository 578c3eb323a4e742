//! HTTP server command
//!
//! Bootstraps the schema, then serves every route until shutdown.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use desaweb_server::server::DEFAULT_UPLOAD_LIMIT;
use desaweb_server::{bootstrap, run_server, AssetStore, DbConfig, ServerConfig};

use super::DbArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Root directory for uploaded images (blogs/ and desa/ live under it)
    #[arg(long, env = "UPLOADS_DIR", default_value = "uploads")]
    pub uploads_dir: PathBuf,

    /// Maximum request body size in bytes
    #[arg(long, env = "UPLOAD_LIMIT_BYTES", default_value_t = DEFAULT_UPLOAD_LIMIT)]
    pub upload_limit: usize,

    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let db_config = DbConfig::from(args.db);

    // Connect failures are fatal; table failures are logged and skipped
    let pool = bootstrap(&db_config)
        .await
        .context("Failed to prepare database")?;

    let config = ServerConfig {
        bind_addr: SocketAddr::new(args.host, args.port),
        upload_limit: args.upload_limit,
    };

    tracing::info!("Starting desaweb server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(pool, AssetStore::new(args.uploads_dir), config)
        .await
        .context("Server error")?;

    Ok(())
}
