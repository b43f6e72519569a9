//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Finora - Budget, classify and analyze your spending
#[derive(Parser)]
#[command(name = "finora")]
#[command(about = "Self-hosted personal finance backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "finora.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set FINORA_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires a bearer key from FINORA_API_KEYS.
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Classify a transaction description
    Classify {
        /// Transaction description
        description: String,

        /// Transaction amount (passed to the hosted model as context)
        #[arg(short, long)]
        amount: Option<f64>,

        /// Skip the hosted model even if OLLAMA_HOST is set
        #[arg(long)]
        keywords_only: bool,
    },

    /// Show the category table
    Categories,

    /// Show the 50/30/20 split of a monthly income
    Advice {
        /// Monthly income
        income: f64,
    },

    /// Analyze a user's spending for one month
    Analyze {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Month (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Declared monthly income (defaults to the month's income transactions)
        #[arg(short, long)]
        income: Option<f64>,

        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// Manage a user's accounts
    Accounts {
        #[command(subcommand)]
        action: AccountsAction,
    },

    /// Manage transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Manage monthly category budgets
    Budgets {
        #[command(subcommand)]
        action: BudgetsAction,
    },

    /// Manage savings goals
    Goals {
        #[command(subcommand)]
        action: GoalsAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    List,

    /// Register a user
    Add {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
pub enum AccountsAction {
    /// List a user's accounts
    List {
        #[arg(short, long)]
        user: i64,
    },

    /// Add an account
    Add {
        #[arg(short, long)]
        user: i64,

        #[arg(long)]
        name: String,

        /// Account type: checking, savings, credit, cash
        #[arg(long = "type", default_value = "checking")]
        account_type: String,

        /// Opening balance
        #[arg(long, default_value = "0")]
        balance: f64,
    },
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List a user's transactions, newest first
    List {
        #[arg(short, long)]
        user: i64,

        /// Month filter (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,

        /// Category filter
        #[arg(short, long)]
        category: Option<String>,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Record a transaction (classified automatically unless --category is given)
    Add {
        #[arg(short, long)]
        user: i64,

        #[arg(long)]
        account: i64,

        /// Amount (non-negative)
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        description: String,

        #[arg(long)]
        category: Option<String>,

        /// Record as income instead of an expense
        #[arg(long)]
        income: bool,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a transaction and reverse its balance effect
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budgets with amounts spent
    List {
        #[arg(short, long)]
        user: i64,

        /// Month filter (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Create a budget for a category and month
    Set {
        #[arg(short, long)]
        user: i64,

        #[arg(long)]
        category: String,

        /// Month (YYYY-MM)
        #[arg(long)]
        month: String,

        /// Allocated amount
        #[arg(long)]
        amount: f64,
    },

    /// Delete a budget
    Delete { id: i64 },
}

#[derive(Subcommand)]
pub enum GoalsAction {
    /// List goals with progress
    List {
        #[arg(short, long)]
        user: i64,
    },

    /// Create a savings goal
    Add {
        #[arg(short, long)]
        user: i64,

        #[arg(long)]
        name: String,

        /// Target amount
        #[arg(long)]
        target: f64,

        /// Amount already saved
        #[arg(long, default_value = "0")]
        current: f64,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<NaiveDate>,

        /// Mark as a large goal (listed first)
        #[arg(long)]
        large: bool,

        #[arg(long)]
        glyph: Option<String>,
    },

    /// Add money to a goal
    Contribute { id: i64, amount: f64 },

    /// Delete a goal
    Delete { id: i64 },
}
