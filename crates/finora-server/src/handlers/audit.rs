//! Audit log handlers

use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    Json,
};
use serde::Deserialize;

use crate::{request_actor, AppError, AppState, MAX_PAGE_LIMIT};
use finora_core::db::{AuditFilter, DEFAULT_AUDIT_LIMIT};
use finora_core::AuditEntry;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub actor: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/audit - Recent audit entries, optionally filtered
pub async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuditQuery>,
    request: Request,
) -> Result<Json<Vec<AuditEntry>>, AppError> {
    let actor = request_actor(request.headers());

    let filter = AuditFilter {
        limit: params
            .limit
            .unwrap_or(DEFAULT_AUDIT_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT),
        actor: params.actor,
        entity_type: params.entity_type,
        entity_id: params.entity_id,
    };
    let entries = state.db.list_audit_log(&filter)?;

    // Reading the log is itself logged
    state.db.log_audit(
        actor,
        "list",
        Some("audit_log"),
        None,
        Some(&format!("limit={}, returned={}", filter.limit, entries.len())),
    )?;

    Ok(Json(entries))
}
