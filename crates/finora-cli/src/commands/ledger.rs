//! User and account commands

use anyhow::{anyhow, Result};
use finora_core::db::Database;
use finora_core::models::{AccountType, NewAccount, NewUser};

use super::{money, truncate};

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Add one with:");
        println!("  finora users add --username alice --email alice@example.com");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────");
    for user in users {
        println!(
            "   {:>4} │ {:<20} │ {}",
            user.id,
            truncate(&user.username, 20),
            user.email
        );
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, username: &str, email: &str) -> Result<()> {
    let user = db.create_user(&NewUser {
        username: username.to_string(),
        email: email.to_string(),
    })?;

    println!("✅ Created user {} ({}) with ID {}", user.username, user.email, user.id);
    Ok(())
}

pub fn cmd_accounts_list(db: &Database, user_id: i64) -> Result<()> {
    db.require_user(user_id)?;
    let accounts = db.list_accounts(user_id)?;

    if accounts.is_empty() {
        println!("No accounts for user {}.", user_id);
        return Ok(());
    }

    println!();
    println!("🏦 Accounts");
    println!("   ─────────────────────────────────────────────");
    let mut total = 0.0;
    for account in accounts {
        total += account.balance;
        println!(
            "   {:>4} │ {:<20} │ {:<8} │ {:>12}",
            account.id,
            truncate(&account.name, 20),
            account.account_type,
            money(account.balance)
        );
    }
    println!("   ─────────────────────────────────────────────");
    println!("   Total: {}", money(total));

    Ok(())
}

pub fn cmd_accounts_add(
    db: &Database,
    user_id: i64,
    name: &str,
    account_type: &str,
    balance: f64,
) -> Result<()> {
    let account_type: AccountType = account_type.parse().map_err(|e: String| anyhow!(e))?;
    let account = db.create_account(
        user_id,
        &NewAccount {
            name: name.to_string(),
            account_type,
            balance,
        },
    )?;

    println!(
        "✅ Created {} account '{}' with ID {} (balance {})",
        account.account_type,
        account.name,
        account.id,
        money(account.balance)
    );
    Ok(())
}
