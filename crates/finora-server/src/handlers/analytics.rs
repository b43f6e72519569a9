//! Spending analytics and budget advice handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{request_actor, AppError, AppState};
use finora_core::allocator::{allocate, BudgetAdvice};
use finora_core::analytics::{AnalyticsSnapshot, MonthRange};

#[derive(Debug, Deserialize)]
pub struct MonthlyAnalyticsQuery {
    /// Month to analyze (YYYY-MM); defaults to the current month
    pub month: Option<String>,
    /// Declared monthly income; income transactions are used when absent
    pub monthly_income: Option<f64>,
}

/// GET /api/users/:id/analytics/monthly - Monthly spending snapshot
pub async fn monthly_analytics(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    Query(params): Query<MonthlyAnalyticsQuery>,
    request: Request,
) -> Result<Json<AnalyticsSnapshot>, AppError> {
    let actor = request_actor(request.headers());

    let month = match params.month.as_deref() {
        Some(m) => m.parse::<MonthRange>()?,
        None => MonthRange::current(),
    };
    if let Some(income) = params.monthly_income {
        if !income.is_finite() || income < 0.0 {
            return Err(AppError::bad_request(
                "monthly_income must be a non-negative number",
            ));
        }
    }

    let snapshot = state
        .db
        .monthly_analytics(user_id, &month, params.monthly_income)?;

    state.db.log_audit(
        actor,
        "view",
        Some("analytics"),
        Some(user_id),
        Some(&format!("month={}", month)),
    )?;

    Ok(Json(snapshot))
}

#[derive(Debug, Deserialize)]
pub struct BudgetAdviceQuery {
    pub total_income: Option<f64>,
}

/// GET /api/budget-advice - 50/30/20 split of a monthly income
pub async fn budget_advice(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BudgetAdviceQuery>,
    request: Request,
) -> Result<Json<BudgetAdvice>, AppError> {
    let actor = request_actor(request.headers());

    let income = params
        .total_income
        .filter(|x| x.is_finite() && *x > 0.0)
        .ok_or_else(|| AppError::bad_request("total_income must be a positive number"))?;

    let advice = allocate(income);

    state
        .db
        .log_audit(actor, "view", Some("budget_advice"), None, None)?;

    Ok(Json(advice))
}
