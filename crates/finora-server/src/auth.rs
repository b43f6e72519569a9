//! Bearer API key authentication

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::AppState;

/// Paths reachable without credentials
const PUBLIC_PATHS: &[&str] = &["/api/health"];

/// Audit actor for requests carrying a bearer key
pub const API_KEY_ACTOR: &str = "api-key";

/// Audit actor for requests without credentials (only possible with --no-auth)
pub const LOCAL_ACTOR: &str = "local-dev";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Check a presented key against the configured ones
///
/// Every configured key is compared so the time taken does not depend on
/// which key matched.
pub fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    valid_keys.iter().fold(false, |found, key| {
        let same = key.len() == provided.len()
            && bool::from(key.as_bytes().ct_eq(provided.as_bytes()));
        found | same
    })
}

/// Name recorded in the audit log for a request
pub fn request_actor(headers: &HeaderMap) -> &'static str {
    match bearer_token(headers) {
        Some(_) => API_KEY_ACTOR,
        None => LOCAL_ACTOR,
    }
}

/// Reject requests without a valid bearer key unless auth is disabled
pub(crate) async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if !state.config.require_auth || PUBLIC_PATHS.contains(&path.as_str()) {
        return next.run(request).await;
    }

    let authorized = bearer_token(request.headers())
        .is_some_and(|key| validate_api_key(key, &state.config.api_keys));

    if authorized {
        debug!(path = %path, "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %path, "Rejected request without a valid API key");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({ "error": "Authentication required" })),
    )
        .into_response()
}
