//! Mock backend for testing
//!
//! Useful for unit tests and development without a running LLM server.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::CategorySuggestion;
use super::AIBackend;

/// Mock AI backend for testing
///
/// Recognizes a handful of well-known merchants. Anything else comes back as
/// `Other`, which is not a table category.
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true (and calls succeed)
    pub healthy: bool,
    /// Fixed answer returned for every description
    pub fixed: Option<CategorySuggestion>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            fixed: None,
        }
    }

    /// Create an unhealthy mock backend; every call fails
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            fixed: None,
        }
    }

    /// Create a mock that always answers with the given category
    pub fn answering(category: &str, confidence: Option<f64>) -> Self {
        Self {
            healthy: true,
            fixed: Some(CategorySuggestion {
                category: category.to_string(),
                confidence,
            }),
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn classify_transaction(
        &self,
        description: &str,
        _amount: Option<f64>,
        _categories: &[&str],
    ) -> Result<CategorySuggestion> {
        if !self.healthy {
            return Err(Error::Ai("mock backend is unavailable".into()));
        }
        if let Some(ref fixed) = self.fixed {
            return Ok(fixed.clone());
        }

        let category = match description.to_uppercase().as_str() {
            d if d.contains("NETFLIX") || d.contains("SPOTIFY") => "Entertainment",
            d if d.contains("STARBUCKS") => "Dining",
            d if d.contains("UBER") || d.contains("SHELL") => "Transportation",
            d if d.contains("WHOLE FOODS") || d.contains("WHOLEFDS") => "Groceries",
            d if d.contains("AMAZON") => "Shopping",
            _ => "Other",
        };

        Ok(CategorySuggestion {
            category: category.to_string(),
            confidence: Some(0.9),
        })
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
