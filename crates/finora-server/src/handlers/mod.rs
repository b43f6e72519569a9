//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod accounts;
pub mod analytics;
pub mod audit;
pub mod budgets;
pub mod chat;
pub mod classify;
pub mod goals;
pub mod health;
pub mod transactions;
pub mod users;

// Re-export all handlers for use in router
pub use accounts::*;
pub use analytics::*;
pub use audit::*;
pub use budgets::*;
pub use chat::*;
pub use classify::*;
pub use goals::*;
pub use health::*;
pub use transactions::*;
pub use users::*;
