//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

/// Category picked by a hosted model for a transaction description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    /// Category name as the model wrote it (not yet checked against the table)
    pub category: String,
    /// Model-reported confidence, when it gives one
    #[serde(default)]
    pub confidence: Option<f64>,
}
