//! desaweb-server: HTTP backend for a small village content site
//!
//! Serves login/user records, blog posts with image uploads, a site
//! description and village staff records from MySQL, with uploaded images
//! kept on disk and served statically.

pub mod assets;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod server;
pub mod state;

pub use assets::{AssetClass, AssetStore, RemoveOutcome};
pub use config::{ConfigError, DbConfig};
pub use db::{bootstrap, bootstrap_with_report, BootstrapError, DbError, TableStatus};
pub use error::ApiError;
pub use lifecycle::{BlogLifecycle, BlogRecords};
pub use server::{build_router, run_server, ServerConfig, ServerError};
pub use state::AppState;
