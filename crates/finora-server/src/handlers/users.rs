//! User handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};

use crate::{read_json, request_actor, AppError, AppState};
use finora_core::models::{NewUser, User};

/// GET /api/users - List all users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Vec<User>>, AppError> {
    let actor = request_actor(request.headers());

    let users = state.db.list_users()?;

    state.db.log_audit(
        actor,
        "list",
        Some("user"),
        None,
        Some(&format!("count={}", users.len())),
    )?;

    Ok(Json(users))
}

/// POST /api/users - Register a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, Json<User>), AppError> {
    let actor = request_actor(request.headers());
    let req: NewUser = read_json(request).await?;

    let user = state.db.create_user(&req)?;

    state.db.log_audit(
        actor,
        "create",
        Some("user"),
        Some(user.id),
        Some(&format!("username={}", user.username)),
    )?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id - Get a single user
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<User>, AppError> {
    let actor = request_actor(request.headers());

    let user = state
        .db
        .get_user(id)?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;

    state
        .db
        .log_audit(actor, "get", Some("user"), Some(id), None)?;

    Ok(Json(user))
}
