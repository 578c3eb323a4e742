//! Village staff endpoints (read-only)

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::db::repos::{DesaRepo, DesaStaff};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/desa
async fn list_desa(State(state): State<AppState>) -> Result<Json<Vec<DesaStaff>>, ApiError> {
    let staff = DesaRepo::new(state.pool()).list().await?;
    Ok(Json(staff))
}

/// GET /api/desa/{id}
async fn get_desa(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DesaStaff>, ApiError> {
    let staff = DesaRepo::new(state.pool()).get(id).await?;
    Ok(Json(staff))
}

/// Village staff routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/desa", get(list_desa))
        .route("/api/desa/{id}", get(get_desa))
}
