//! Transaction command implementations

use anyhow::{bail, Result};
use finora_core::analytics::MonthRange;
use finora_core::db::{Database, TransactionQuery};
use finora_core::models::{Direction, NewTransaction};
use finora_core::{resolve_category, AIClient};
use tracing::debug;

use super::{money, truncate};

pub fn cmd_transactions_list(
    db: &Database,
    user_id: i64,
    month: Option<&str>,
    category: Option<&str>,
    limit: i64,
) -> Result<()> {
    db.require_user(user_id)?;
    let query = TransactionQuery {
        month: month.map(str::parse::<MonthRange>).transpose()?,
        category: category.map(String::from),
        limit: Some(limit.max(1)),
    };
    let transactions = db.list_transactions(user_id, &query)?;

    if transactions.is_empty() {
        println!("No transactions found. Record one with:");
        println!(
            "  finora transactions add --user {} --account <id> --amount 4.50 --description \"Coffee\"",
            user_id
        );
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.direction {
            Direction::Expense => format!("\x1b[31m-{}\x1b[0m", money(tx.amount)),
            Direction::Income => format!("\x1b[32m+{}\x1b[0m", money(tx.amount)),
        };

        println!(
            "   {:>4} │ {} │ {:>12} │ {:<14} │ {}",
            tx.id,
            tx.date,
            amount_str,
            truncate(&tx.category, 14),
            truncate(&tx.description, 40)
        );
    }

    Ok(())
}

pub async fn cmd_transactions_add(
    db: &Database,
    ai: Option<&AIClient>,
    user_id: i64,
    tx: &NewTransaction,
) -> Result<()> {
    tx.validate()?;

    let category =
        resolve_category(ai, tx.category.as_deref(), &tx.description, Some(tx.amount)).await;
    debug!(category = %category, ai = ai.is_some(), "Resolved transaction category");
    let created = db.create_transaction(user_id, tx, &category)?;

    println!(
        "✅ Recorded {} {} '{}' as {} (ID {})",
        created.direction,
        money(created.amount),
        created.description,
        created.category,
        created.id
    );

    if let Some(account) = db.get_account(created.account_id)? {
        println!("   {} balance: {}", account.name, money(account.balance));
    }

    Ok(())
}

pub fn cmd_transactions_delete(db: &Database, id: i64) -> Result<()> {
    if !db.delete_transaction(id)? {
        bail!("Transaction {} not found", id);
    }

    println!("🗑️  Deleted transaction {}", id);
    Ok(())
}
