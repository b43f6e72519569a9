//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

use super::parsing::parse_category_suggestion;
use super::types::CategorySuggestion;
use super::AIBackend;

/// Default request timeout for hosted classification
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Ollama backend
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OllamaBackend {
    /// Create a new Ollama backend with the default timeout
    pub fn new(base_url: &str, model: &str) -> Self {
        Self::with_timeout(base_url, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama backend with an explicit request timeout
    pub fn with_timeout(base_url: &str, model: &str, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        }
    }

    /// Create from environment variables
    ///
    /// Returns None when `OLLAMA_HOST` is not set.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        let timeout = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self::with_timeout(
            &host,
            &model,
            Duration::from_secs(timeout),
        ))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

fn classification_prompt(description: &str, amount: Option<f64>, categories: &[&str]) -> String {
    let amount_line = amount
        .map(|a| format!("Amount: {:.2}\n", a))
        .unwrap_or_default();
    format!(
        "You categorize personal finance transactions.\n\
         Choose exactly one category from this list: {}.\n\
         Transaction: \"{}\"\n\
         {}\
         Respond with JSON only: {{\"category\": \"<name>\", \"confidence\": <0.0-1.0>}}",
        categories.join(", "),
        description,
        amount_line
    )
}

#[async_trait]
impl AIBackend for OllamaBackend {
    async fn classify_transaction(
        &self,
        description: &str,
        amount: Option<f64>,
        categories: &[&str],
    ) -> Result<CategorySuggestion> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: classification_prompt(description, amount, categories),
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if let Err(e) = response.error_for_status_ref() {
            return Err(Error::Http(e));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama classify response: {}", ollama_response.response);

        parse_category_suggestion(&ollama_response.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
