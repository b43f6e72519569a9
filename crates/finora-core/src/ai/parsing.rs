//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the JSON payload in extra prose, so the object is cut
//! out between the first `{` and the last `}` before deserializing.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

use super::types::CategorySuggestion;

fn truncate(s: &str) -> String {
    if s.chars().count() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s.to_string()
    }
}

/// Extract and deserialize the first JSON object embedded in a response
fn extract_json<T: DeserializeOwned>(response: &str) -> Result<T> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            serde_json::from_str(json_str).map_err(|e| {
                Error::InvalidData(format!(
                    "Invalid JSON from AI: {} | Raw: {}",
                    e,
                    truncate(json_str)
                ))
            })
        }
        _ => Err(Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            truncate(response)
        ))),
    }
}

/// Parse a category suggestion from AI response
pub fn parse_category_suggestion(response: &str) -> Result<CategorySuggestion> {
    let suggestion: CategorySuggestion = extract_json(response)?;
    if suggestion.category.trim().is_empty() {
        return Err(Error::InvalidData("AI returned an empty category".into()));
    }
    Ok(suggestion)
}
