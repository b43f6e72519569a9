//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database setup (init) and shared utilities (open_db)
//! - `classify` - Classification, category table and 50/30/20 advice
//! - `analyze` - Monthly spending analysis
//! - `ledger` - Users and accounts
//! - `transactions` - Transaction commands (list, add, delete)
//! - `budgets` - Monthly category budgets
//! - `goals` - Savings goals
//! - `serve` - Web server command

pub mod analyze;
pub mod budgets;
pub mod classify;
pub mod core;
pub mod goals;
pub mod ledger;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use analyze::*;
pub use budgets::*;
pub use classify::*;
pub use core::*;
pub use goals::*;
pub use ledger::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a money amount with two decimals
pub fn money(amount: f64) -> String {
    format!("£{:.2}", amount)
}
