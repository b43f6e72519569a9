//! Finora Core Library
//!
//! Shared functionality for the Finora personal finance backend:
//! - Database access and migrations (users, accounts, transactions, budgets, goals)
//! - Keyword transaction classifier with an optional hosted model
//! - 50/30/20 budget allocator
//! - Monthly spending analyzer
//! - Rule-based budgeting chat

pub mod ai;
pub mod allocator;
pub mod analytics;
pub mod categories;
pub mod chat;
pub mod classifier;
pub mod db;
pub mod error;
pub mod goals;
pub mod models;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, CategorySuggestion, MockBackend, OllamaBackend};
pub use allocator::{allocate, BudgetAdvice};
pub use analytics::{analyze, analyze_period, AnalyticsSnapshot, Income, MonthRange};
pub use categories::{CategoryGroup, CategoryInfo};
pub use chat::{ChatMessage, ChatReply, ChatSessionStore};
pub use classifier::{classify, classify_with_backend, resolve_category, Classification};
pub use db::{AuditEntry, AuditFilter, Database, TransactionQuery};
pub use error::{Error, Result};
pub use goals::{goal_progress, GoalProgress, GoalStatus};
