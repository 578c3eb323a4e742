//! Site description endpoints

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::db::repos::{Description, DescriptionRepo};
use crate::error::ApiError;
use crate::state::AppState;

use super::common::SuccessResponse;

/// Update description request
#[derive(Debug, Deserialize)]
pub struct UpdateDescriptionRequest {
    pub title: String,
    pub description: String,
}

/// GET /api/description - every row, possibly none
async fn list_description(
    State(state): State<AppState>,
) -> Result<Json<Vec<Description>>, ApiError> {
    let rows = DescriptionRepo::new(state.pool()).list().await?;
    Ok(Json(rows))
}

/// PUT /api/description/{id}
///
/// Succeeds whether or not a row matched the id.
async fn update_description(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDescriptionRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let matched = DescriptionRepo::new(state.pool())
        .update(id, &req.title, &req.description)
        .await?;

    tracing::info!(id, matched, "Description update");
    Ok(Json(SuccessResponse::new("Description updated")))
}

/// Description routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/description", get(list_description))
        .route("/api/description/{id}", put(update_description))
}
