//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{read_json, request_actor, AppError, AppState, SuccessResponse, MAX_PAGE_LIMIT};
use finora_core::categories;
use finora_core::classifier::resolve_category;
use finora_core::db::TransactionQuery;
use finora_core::models::{NewTransaction, Transaction, TransactionUpdate};
use finora_core::MonthRange;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Month filter (YYYY-MM)
    pub month: Option<String>,
    /// Category filter (case-insensitive)
    pub category: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// GET /api/users/:id/transactions - List a user's transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<ListTransactionsQuery>,
    request: Request,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let actor = request_actor(request.headers());

    let month = params
        .month
        .as_deref()
        .map(str::parse::<MonthRange>)
        .transpose()?;
    let limit = params.limit.max(1).min(MAX_PAGE_LIMIT);

    state.db.require_user(user_id)?;
    let transactions = state.db.list_transactions(
        user_id,
        &TransactionQuery {
            month,
            category: params.category.clone(),
            limit: Some(limit),
        },
    )?;

    // Audit log - read access
    state.db.log_audit(
        actor,
        "list",
        Some("transaction"),
        None,
        Some(&format!(
            "user_id={}, month={:?}, category={:?}, count={}",
            user_id,
            params.month,
            params.category,
            transactions.len()
        )),
    )?;

    Ok(Json(transactions))
}

/// POST /api/users/:id/transactions - Record a transaction
///
/// Without a category the description is classified, through the hosted
/// model when one is configured.
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<(StatusCode, Json<Transaction>), AppError> {
    let actor = request_actor(request.headers());
    let req: NewTransaction = read_json(request).await?;
    req.validate()?;

    let category = resolve_category(
        state.ai.as_ref(),
        req.category.as_deref(),
        &req.description,
        Some(req.amount),
    )
    .await;

    let tx = state.db.create_transaction(user_id, &req, &category)?;

    state.db.log_audit(
        actor,
        "create",
        Some("transaction"),
        Some(tx.id),
        Some(&format!(
            "account_id={}, amount={}, direction={}, category={}",
            tx.account_id, tx.amount, tx.direction, tx.category
        )),
    )?;

    Ok((StatusCode::CREATED, Json(tx)))
}

/// GET /api/transactions/:id - Get a single transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let actor = request_actor(request.headers());

    let tx = state
        .db
        .get_transaction(id)?
        .ok_or_else(|| AppError::not_found(format!("Transaction {} not found", id)))?;

    state
        .db
        .log_audit(actor, "get", Some("transaction"), Some(id), None)?;

    Ok(Json(tx))
}

/// PUT /api/transactions/:id - Update a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let actor = request_actor(request.headers());
    let mut req: TransactionUpdate = read_json(request).await?;

    // Known categories are stored under their canonical spelling
    if let Some(def) = req.category.as_deref().and_then(categories::find) {
        req.category = Some(def.name.to_string());
    }

    let tx = state
        .db
        .update_transaction(id, &req)?
        .ok_or_else(|| AppError::not_found(format!("Transaction {} not found", id)))?;

    state.db.log_audit(
        actor,
        "update",
        Some("transaction"),
        Some(id),
        Some(&format!("amount={}, category={}", tx.amount, tx.category)),
    )?;

    Ok(Json(tx))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let actor = request_actor(request.headers());

    if !state.db.delete_transaction(id)? {
        return Err(AppError::not_found(format!("Transaction {} not found", id)));
    }

    state
        .db
        .log_audit(actor, "delete", Some("transaction"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}
