//! desaweb CLI - runs the village site backend
//!
//! - `serve`: bootstrap the schema, then serve the HTTP API and uploads
//! - `bootstrap`: create the database and tables, then exit
//!
//! Settings come from flags, the environment, or a `.env` file in the
//! working directory.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "desaweb",
    author,
    version,
    about = "Backend for the village content site: users, blogs, description and staff"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run HTTP API server (bootstraps the schema first)
    Serve(commands::serve::ServeArgs),
    /// Create the database and tables if absent, then exit
    Bootstrap(commands::bootstrap::BootstrapArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real environment variables still apply
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::serve::run_serve(args).await,
        Commands::Bootstrap(args) => commands::bootstrap::run_bootstrap(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_override_environment() {
        let cli = Cli::try_parse_from([
            "desaweb",
            "serve",
            "--port",
            "8080",
            "--uploads-dir",
            "/srv/uploads",
            "--db-user",
            "root",
            "--db-name",
            "desa",
        ])
        .unwrap();

        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 8080);
                assert_eq!(args.uploads_dir, std::path::PathBuf::from("/srv/uploads"));
                assert_eq!(args.db.db_name, "desa");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
