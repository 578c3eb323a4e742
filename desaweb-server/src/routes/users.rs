//! Login and user management endpoints

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::db::repos::{User, UserRepo};
use crate::error::ApiError;
use crate::state::AppState;

use super::common::SuccessResponse;

/// Login and add-user request
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let matched = UserRepo::new(state.pool())
        .authenticate(&req.username, &req.password)
        .await?;

    if !matched {
        tracing::info!(username = %req.username, "Login rejected");
        return Err(ApiError::Unauthorized);
    }
    Ok(Json(SuccessResponse::new("Login successful")))
}

/// POST /add-user
async fn add_user(
    State(state): State<AppState>,
    Json(req): Json<Credentials>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let id = UserRepo::new(state.pool())
        .create(&req.username, &req.password)
        .await?;

    tracing::info!(id, username = %req.username, "User added");
    Ok(Json(SuccessResponse::new("User added successfully")))
}

/// GET /users
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserRepo::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// DELETE /delete-user/{id}
///
/// Succeeds whether or not the user existed.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let removed = UserRepo::new(state.pool()).delete(id).await?;

    tracing::info!(id, removed, "User delete");
    Ok(Json(SuccessResponse::new("User deleted successfully")))
}

/// User routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/add-user", post(add_user))
        .route("/users", get(list_users))
        .route("/delete-user/{id}", delete(delete_user))
}
