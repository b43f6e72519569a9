//! Savings goal handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{read_json, request_actor, AppError, AppState, SuccessResponse};
use finora_core::goals::{goal_progress, GoalProgress};
use finora_core::models::{Goal, GoalUpdate, NewGoal};

/// GET /api/users/:id/goals - List a user's goals
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<Json<Vec<Goal>>, AppError> {
    let actor = request_actor(request.headers());

    state.db.require_user(user_id)?;
    let goals = state.db.list_goals(user_id)?;

    state.db.log_audit(
        actor,
        "list",
        Some("goal"),
        None,
        Some(&format!("user_id={}, count={}", user_id, goals.len())),
    )?;

    Ok(Json(goals))
}

/// POST /api/users/:id/goals - Create a savings goal
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
    request: Request,
) -> Result<(StatusCode, Json<Goal>), AppError> {
    let actor = request_actor(request.headers());
    let req: NewGoal = read_json(request).await?;

    let goal = state.db.create_goal(user_id, &req)?;

    state.db.log_audit(
        actor,
        "create",
        Some("goal"),
        Some(goal.id),
        Some(&format!("name={}, target={}", goal.name, goal.target_amount)),
    )?;

    Ok((StatusCode::CREATED, Json(goal)))
}

/// GET /api/goals/:id - Get a single goal
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Goal>, AppError> {
    let actor = request_actor(request.headers());

    let goal = state
        .db
        .get_goal(id)?
        .ok_or_else(|| AppError::not_found(format!("Goal {} not found", id)))?;

    state
        .db
        .log_audit(actor, "get", Some("goal"), Some(id), None)?;

    Ok(Json(goal))
}

/// PUT /api/goals/:id - Update a goal (e.g. record a contribution)
pub async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Goal>, AppError> {
    let actor = request_actor(request.headers());
    let req: GoalUpdate = read_json(request).await?;

    let goal = state
        .db
        .update_goal(id, &req)?
        .ok_or_else(|| AppError::not_found(format!("Goal {} not found", id)))?;

    state.db.log_audit(
        actor,
        "update",
        Some("goal"),
        Some(id),
        Some(&format!("current={}", goal.current_amount)),
    )?;

    Ok(Json(goal))
}

/// DELETE /api/goals/:id - Delete a goal
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let actor = request_actor(request.headers());

    if !state.db.delete_goal(id)? {
        return Err(AppError::not_found(format!("Goal {} not found", id)));
    }

    state
        .db
        .log_audit(actor, "delete", Some("goal"), Some(id), None)?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/goals/:id/progress - Progress toward a goal as of today
pub async fn get_goal_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<GoalProgress>, AppError> {
    let actor = request_actor(request.headers());

    let goal = state
        .db
        .get_goal(id)?
        .ok_or_else(|| AppError::not_found(format!("Goal {} not found", id)))?;

    let progress = goal_progress(&goal, Utc::now().date_naive());

    state
        .db
        .log_audit(actor, "view", Some("goal_progress"), Some(id), None)?;

    Ok(Json(progress))
}
