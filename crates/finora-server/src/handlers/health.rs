//! Liveness handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether a hosted classifier is configured
    pub ai_configured: bool,
    pub version: &'static str,
}

/// GET /api/health - Liveness check (no auth, no audit)
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        ai_configured: state.ai.is_some(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
