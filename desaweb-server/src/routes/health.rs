//! Health check endpoint
//!
//! Reports whether each upload directory is present, since a missing one
//! means stored images cannot be served. Does not query the database.

use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::assets::AssetClass;
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when an upload directory is missing
    pub status: &'static str,
    pub version: &'static str,
    /// Upload directory presence by class name
    pub uploads: BTreeMap<&'static str, bool>,
    /// Open database connections in the pool
    pub db_connections: u32,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut uploads = BTreeMap::new();
    for class in AssetClass::ALL {
        let dir = state.assets().class_dir(class);
        let present = tokio::fs::metadata(&dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !present {
            tracing::warn!(%class, dir = %dir.display(), "Upload directory missing");
        }
        uploads.insert(class.dir_name(), present);
    }

    let status = if uploads.values().all(|present| *present) {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uploads,
        db_connections: state.pool().size(),
    })
}

/// Health routes
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
