//! Create the database and tables without starting the server

use anyhow::{bail, Context, Result};
use clap::Parser;

use desaweb_server::{bootstrap_with_report, DbConfig};

use super::DbArgs;

/// Arguments for the bootstrap command
#[derive(Parser, Debug)]
pub struct BootstrapArgs {
    #[command(flatten)]
    pub db: DbArgs,
}

/// Run the schema bootstrap once and report per-table results
pub async fn run_bootstrap(args: BootstrapArgs) -> Result<()> {
    let config = DbConfig::from(args.db);

    let (pool, report) = bootstrap_with_report(&config)
        .await
        .context("Schema bootstrap failed")?;
    pool.close().await;

    let failed: Vec<_> = report
        .iter()
        .filter(|status| !status.is_ready())
        .map(|status| status.table)
        .collect();

    if !failed.is_empty() {
        bail!("Tables not ready: {}", failed.join(", "));
    }

    tracing::info!(database = %config.database, "Schema is ready");
    Ok(())
}
