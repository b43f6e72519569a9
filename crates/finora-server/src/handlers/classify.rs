//! Category table and classification handlers

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    Json,
};
use serde::Deserialize;

use crate::{read_json, request_actor, AppError, AppState};
use finora_core::categories::{self, CategoryInfo};
use finora_core::classifier::{classify, classify_with_backend, Classification};

/// GET /api/categories - The category table
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(categories::all())
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub description: String,
    pub amount: Option<f64>,
}

/// POST /api/classify - Classify a description without storing it
pub async fn classify_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Classification>, AppError> {
    let actor = request_actor(request.headers());
    let req: ClassifyRequest = read_json(request).await?;

    let classification = match state.ai {
        Some(ref ai) => classify_with_backend(ai, &req.description, req.amount).await,
        None => classify(&req.description, req.amount),
    };

    state.db.log_audit(
        actor,
        "classify",
        Some("transaction"),
        None,
        Some(&format!("category={}", classification.category)),
    )?;

    Ok(Json(classification))
}
