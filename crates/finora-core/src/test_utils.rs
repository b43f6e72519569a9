//! Test utilities for finora-core
//!
//! This module provides testing infrastructure including a mock Ollama server
//! that can be used for development and integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// How the mock answers `/api/generate`
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Pick a category from merchant names in the prompt
    Merchants,
    /// Always answer with this raw model output
    Fixed(String),
    /// Respond with HTTP 500
    ServerError,
    /// Sleep before answering, to exercise client timeouts
    Slow(Duration),
}

/// Mock Ollama server for testing and development
pub struct MockOllamaServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockOllamaServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with(MockBehavior::Merchants).await
    }

    /// Start the mock server with a specific `/api/generate` behavior
    pub async fn start_with(behavior: MockBehavior) -> Self {
        let app = Router::new()
            .route("/api/tags", get(handle_tags))
            .route("/api/generate", post(handle_generate))
            .with_state(behavior);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockOllamaServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ollama tags endpoint response (health check)
async fn handle_tags() -> Json<TagsResponse> {
    Json(TagsResponse {
        models: vec![ModelInfo {
            name: "llama3.2:latest".to_string(),
            modified_at: "2024-01-01T00:00:00Z".to_string(),
            size: 4_000_000_000,
        }],
    })
}

/// Ollama generate endpoint
async fn handle_generate(
    State(behavior): State<MockBehavior>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    let response = match behavior {
        MockBehavior::Merchants => merchant_answer(&request.prompt),
        MockBehavior::Fixed(raw) => raw,
        MockBehavior::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response();
        }
        MockBehavior::Slow(delay) => {
            tokio::time::sleep(delay).await;
            merchant_answer(&request.prompt)
        }
    };

    Json(GenerateResponse {
        model: request.model,
        response,
        done: true,
    })
    .into_response()
}

/// Build a model-style answer from the quoted transaction in the prompt
fn merchant_answer(prompt: &str) -> String {
    let description = extract_description(prompt).to_uppercase();

    let category = if description.contains("NETFLIX") || description.contains("SPOTIFY") {
        "Entertainment"
    } else if description.contains("STARBUCKS") || description.contains("PRET") {
        "Dining"
    } else if description.contains("TESCO") || description.contains("SAINSBURY") {
        "Groceries"
    } else if description.contains("TFL") || description.contains("UBER") {
        "Transportation"
    } else if description.contains("PUREGYM") {
        "Fitness"
    } else {
        "Shopping"
    };

    format!(
        "Sure! Here is the category:\n{{\"category\": \"{}\", \"confidence\": 0.88}}",
        category
    )
}

fn extract_description(prompt: &str) -> &str {
    prompt
        .split_once("Transaction: \"")
        .and_then(|(_, rest)| rest.split_once('"'))
        .map(|(desc, _)| desc)
        .unwrap_or(prompt)
}

#[derive(Debug, Serialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    name: String,
    modified_at: String,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    model: String,
    response: String,
    done: bool,
}
