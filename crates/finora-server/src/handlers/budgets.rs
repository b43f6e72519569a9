//! Budget handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{read_json, request_actor, AppError, AppState, SuccessResponse};
use finora_core::models::{Budget, BudgetUpdate, NewBudget};
use finora_core::MonthRange;

#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Month filter (YYYY-MM)
    pub month: Option<String>,
}

/// GET /api/users/:id/budgets - List budgets with spent amounts
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<BudgetQuery>,
    request: Request,
) -> Result<Json<Vec<Budget>>, AppError> {
    let actor = request_actor(request.headers());

    let month = params
        .month
        .as_deref()
        .map(str::parse::<MonthRange>)
        .transpose()?;

    state.db.require_user(user_id)?;
    let budgets = state.db.list_budgets(user_id, month.as_ref())?;

    state.db.log_audit(
        actor,
        "list",
        Some("budget"),
        None,
        Some(&format!("user_id={}, count={}", user_id, budgets.len())),
    )?;

    Ok(Json(budgets))
}

/// POST /api/users/:id/budgets - Create a monthly category budget
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<(StatusCode, Json<Budget>), AppError> {
    let actor = request_actor(request.headers());
    let req: NewBudget = read_json(request).await?;

    let budget = state.db.create_budget(user_id, &req)?;

    state.db.log_audit(
        actor,
        "create",
        Some("budget"),
        Some(budget.id),
        Some(&format!(
            "category={}, month={}, allocated={}",
            budget.category, budget.month, budget.allocated
        )),
    )?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /api/budgets/:id - Get a single budget
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let actor = request_actor(request.headers());

    let budget = state
        .db
        .get_budget(id)?
        .ok_or_else(|| AppError::not_found(format!("Budget {} not found", id)))?;

    state
        .db
        .log_audit(actor, "get", Some("budget"), Some(id), None)?;

    Ok(Json(budget))
}

/// PUT /api/budgets/:id - Update a budget
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Budget>, AppError> {
    let actor = request_actor(request.headers());
    let req: BudgetUpdate = read_json(request).await?;

    let budget = state
        .db
        .update_budget(id, &req)?
        .ok_or_else(|| AppError::not_found(format!("Budget {} not found", id)))?;

    state.db.log_audit(
        actor,
        "update",
        Some("budget"),
        Some(id),
        Some(&format!("allocated={}", budget.allocated)),
    )?;

    Ok(Json(budget))
}

/// DELETE /api/budgets/:id - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let actor = request_actor(request.headers());

    if !state.db.delete_budget(id)? {
        return Err(AppError::not_found(format!("Budget {} not found", id)));
    }

    state
        .db
        .log_audit(actor, "delete", Some("budget"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
