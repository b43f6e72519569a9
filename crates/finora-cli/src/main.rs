//! Finora CLI - Personal finance backend
//!
//! Usage:
//!   finora init                          Initialize database
//!   finora classify "STARBUCKS #42"      Classify a description
//!   finora analyze --user 1              Monthly spending analysis
//!   finora serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Classify {
            description,
            amount,
            keywords_only,
        } => commands::cmd_classify(&description, amount, keywords_only).await,
        Commands::Categories => commands::cmd_categories(),
        Commands::Advice { income } => commands::cmd_advice(income),
        Commands::Analyze {
            user,
            month,
            income,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_analyze(&db, user, month.as_deref(), income, json)
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add { username, email }) => {
                    commands::cmd_users_add(&db, &username, &email)
                }
            }
        }
        Commands::Accounts { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                AccountsAction::List { user } => commands::cmd_accounts_list(&db, user),
                AccountsAction::Add {
                    user,
                    name,
                    account_type,
                    balance,
                } => commands::cmd_accounts_add(&db, user, &name, &account_type, balance),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                TransactionsAction::List {
                    user,
                    month,
                    category,
                    limit,
                } => commands::cmd_transactions_list(
                    &db,
                    user,
                    month.as_deref(),
                    category.as_deref(),
                    limit,
                ),
                TransactionsAction::Add {
                    user,
                    account,
                    amount,
                    description,
                    category,
                    income,
                    date,
                    notes,
                } => {
                    let ai = finora_core::AIClient::from_env();
                    let tx = finora_core::models::NewTransaction {
                        account_id: account,
                        amount,
                        description,
                        category,
                        direction: if income {
                            finora_core::models::Direction::Income
                        } else {
                            finora_core::models::Direction::Expense
                        },
                        date,
                        notes,
                    };
                    commands::cmd_transactions_add(&db, ai.as_ref(), user, &tx).await
                }
                TransactionsAction::Delete { id } => commands::cmd_transactions_delete(&db, id),
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                BudgetsAction::List { user, month } => {
                    commands::cmd_budgets_list(&db, user, month.as_deref())
                }
                BudgetsAction::Set {
                    user,
                    category,
                    month,
                    amount,
                } => commands::cmd_budgets_set(&db, user, &category, &month, amount),
                BudgetsAction::Delete { id } => commands::cmd_budgets_delete(&db, id),
            }
        }
        Commands::Goals { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                GoalsAction::List { user } => commands::cmd_goals_list(&db, user),
                GoalsAction::Add {
                    user,
                    name,
                    target,
                    current,
                    deadline,
                    large,
                    glyph,
                } => {
                    let goal = finora_core::models::NewGoal {
                        name,
                        glyph: glyph
                            .unwrap_or_else(|| finora_core::models::DEFAULT_GOAL_GLYPH.to_string()),
                        target_amount: target,
                        current_amount: current,
                        deadline,
                        priority: if large {
                            finora_core::models::GoalPriority::Large
                        } else {
                            finora_core::models::GoalPriority::Small
                        },
                    };
                    commands::cmd_goals_add(&db, user, &goal)
                }
                GoalsAction::Contribute { id, amount } => {
                    commands::cmd_goals_contribute(&db, id, amount)
                }
                GoalsAction::Delete { id } => commands::cmd_goals_delete(&db, id),
            }
        }
    }
}
