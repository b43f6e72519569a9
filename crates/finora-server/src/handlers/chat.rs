//! Budgeting assistant chat handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{read_json, request_actor, AppError, AppState, SuccessResponse};
use finora_core::chat::{self, ChatMessage, ChatReply, ANONYMOUS_USER};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Session key; numeric or string ids are both accepted
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

fn session_key(user_id: Option<&serde_json::Value>) -> String {
    match user_id {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => ANONYMOUS_USER.to_string(),
    }
}

/// POST /api/chat - Ask the budgeting assistant
pub async fn chat(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<ChatReply>, AppError> {
    let actor = request_actor(request.headers());
    let req: ChatRequest = read_json(request).await?;

    chat::validate_message(&req.message)?;
    let user = session_key(req.user_id.as_ref());

    let reply = chat::reply(&state.chat, &user, &req.message);

    state.db.log_audit(
        actor,
        "chat",
        Some("chat"),
        None,
        Some(&format!("session={}", user)),
    )?;

    Ok(Json(reply))
}

/// GET /api/chat/:user_id/history - A session's recent messages
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    request: Request,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let actor = request_actor(request.headers());

    let history = state.chat.history(&user_id);

    state.db.log_audit(
        actor,
        "view",
        Some("chat_history"),
        None,
        Some(&format!("session={}, count={}", user_id, history.len())),
    )?;

    Ok(Json(history))
}

/// DELETE /api/chat/:user_id/history - Forget a session
pub async fn clear_chat_history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    request: Request,
) -> Result<Json<SuccessResponse>, AppError> {
    let actor = request_actor(request.headers());

    let cleared = state.chat.clear(&user_id);

    state.db.log_audit(
        actor,
        "delete",
        Some("chat_history"),
        None,
        Some(&format!("session={}", user_id)),
    )?;

    Ok(Json(SuccessResponse { success: cleared }))
}
