//! Account management handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};

use crate::{read_json, request_actor, AppError, AppState};
use finora_core::models::{Account, NewAccount};

/// GET /api/users/:id/accounts - List a user's accounts
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<Vec<Account>>, AppError> {
    let actor = request_actor(request.headers());

    state.db.require_user(user_id)?;
    let accounts = state.db.list_accounts(user_id)?;

    // Audit log - read access
    state.db.log_audit(
        actor,
        "list",
        Some("account"),
        None,
        Some(&format!("user_id={}, count={}", user_id, accounts.len())),
    )?;

    Ok(Json(accounts))
}

/// POST /api/users/:id/accounts - Create an account
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let actor = request_actor(request.headers());
    let req: NewAccount = read_json(request).await?;

    let account = state.db.create_account(user_id, &req)?;

    // Audit log
    state.db.log_audit(
        actor,
        "create",
        Some("account"),
        Some(account.id),
        Some(&format!(
            "user_id={}, name={}, type={}",
            user_id, account.name, account.account_type
        )),
    )?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/accounts/:id - Get a single account
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Account>, AppError> {
    let actor = request_actor(request.headers());

    let account = state
        .db
        .get_account(id)?
        .ok_or_else(|| AppError::not_found(format!("Account {} not found", id)))?;

    state
        .db
        .log_audit(actor, "get", Some("account"), Some(id), None)?;

    Ok(Json(account))
}
