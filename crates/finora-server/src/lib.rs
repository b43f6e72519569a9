//! Finora Web Server
//!
//! Axum-based REST API for the Finora personal finance backend.
//!
//! Security features:
//! - API key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Request body size limits
//! - Full audit logging for all API access (reads and writes)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use serde::{de::DeserializeOwned, Serialize};
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{info, warn};

use finora_core::ai::{AIBackend, AIClient};
use finora_core::chat::ChatSessionStore;
use finora_core::db::Database;

mod auth;
mod error;
mod handlers;

pub use auth::{request_actor, validate_api_key, API_KEY_ACTOR, LOCAL_ACTOR};
pub use error::AppError;

/// Maximum JSON request body size (10 KB)
pub const MAX_BODY_SIZE: usize = 1024 * 10;

/// Maximum pagination limit
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys accepted as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: Vec::new(),
            api_keys: Vec::new(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Hosted classifier; None means keyword classification only
    pub ai: Option<AIClient>,
    /// Per-user chat history
    pub chat: ChatSessionStore,
}

/// Parse a comma-separated list, dropping empty entries
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Read a JSON request body of at most [`MAX_BODY_SIZE`] bytes
pub(crate) async fn read_json<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(request.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes).map_err(|_| AppError::bad_request("Invalid JSON"))
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        return layer;
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %o, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        // Users and accounts
        .route("/users", get(handlers::list_users).post(handlers::create_user))
        .route("/users/:id", get(handlers::get_user))
        .route(
            "/users/:id/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route("/accounts/:id", get(handlers::get_account))
        // Ledger
        .route(
            "/users/:id/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route(
            "/transactions/:id",
            get(handlers::get_transaction)
                .put(handlers::update_transaction)
                .delete(handlers::delete_transaction),
        )
        .route(
            "/users/:id/budgets",
            get(handlers::list_budgets).post(handlers::create_budget),
        )
        .route(
            "/budgets/:id",
            get(handlers::get_budget)
                .put(handlers::update_budget)
                .delete(handlers::delete_budget),
        )
        .route(
            "/users/:id/goals",
            get(handlers::list_goals).post(handlers::create_goal),
        )
        .route(
            "/goals/:id",
            get(handlers::get_goal)
                .put(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        .route("/goals/:id/progress", get(handlers::get_goal_progress))
        // Analysis
        .route(
            "/users/:id/analytics/monthly",
            get(handlers::monthly_analytics),
        )
        .route("/budget-advice", get(handlers::budget_advice))
        .route("/categories", get(handlers::list_categories))
        .route("/classify", post(handlers::classify_transaction))
        // Assistant
        .route("/chat", post(handlers::chat))
        .route(
            "/chat/:user_id/history",
            get(handlers::chat_history).delete(handlers::clear_chat_history),
        )
        .route("/audit", get(handlers::list_audit_log))
}

/// Create the application router
///
/// The hosted classifier is configured from the environment.
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let ai = AIClient::from_env();
    match ai {
        Some(ref client) => info!(
            host = %client.host(),
            model = %client.model(),
            "Hosted classifier configured"
        ),
        None => info!("ℹ️  Hosted classifier not configured (set OLLAMA_HOST to enable)"),
    }

    create_router_with_options(db, static_dir, config, ai)
}

/// Create the application router with an explicit AI client (for testing)
pub fn create_router_with_options(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    ai: Option<AIClient>,
) -> Router {
    let cors = cors_layer(&config.allowed_origins);
    let state = Arc::new(AppState {
        db,
        config,
        ai,
        chat: ChatSessionStore::new(),
    });

    let app = Router::new()
        .nest("/api", api_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    }
}

/// Start the server with the default (authenticated) configuration
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        warn!("⚠️  No API keys configured; every authenticated route will answer 401");
    }

    report_ai_status().await;

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Log whether the hosted classifier answers before taking traffic
async fn report_ai_status() {
    let Some(client) = AIClient::from_env() else {
        info!("ℹ️  Using keyword classification only");
        return;
    };

    if client.health_check().await {
        info!(host = %client.host(), model = %client.model(), "✅ Hosted classifier reachable");
    } else {
        warn!(
            host = %client.host(),
            "⚠️  Hosted classifier not responding; keyword fallback will be used"
        );
    }
}

#[cfg(test)]
mod tests;
