//! Budget command implementations

use anyhow::{bail, Result};
use finora_core::analytics::MonthRange;
use finora_core::db::Database;
use finora_core::models::NewBudget;

use super::money;

pub fn cmd_budgets_list(db: &Database, user_id: i64, month: Option<&str>) -> Result<()> {
    db.require_user(user_id)?;
    let month = month.map(str::parse::<MonthRange>).transpose()?;
    let budgets = db.list_budgets(user_id, month.as_ref())?;

    if budgets.is_empty() {
        println!("No budgets found.");
        return Ok(());
    }

    println!();
    println!("📅 Budgets");
    println!("   ─────────────────────────────────────────────────────────");
    for b in budgets {
        let percent = if b.allocated > 0.0 {
            b.spent / b.allocated * 100.0
        } else {
            0.0
        };
        println!(
            "   {:>4} │ {} │ {:<15} │ {:>10} of {:>10} ({:.0}%)",
            b.id,
            b.month,
            b.category,
            money(b.spent),
            money(b.allocated),
            percent
        );
    }

    Ok(())
}

pub fn cmd_budgets_set(
    db: &Database,
    user_id: i64,
    category: &str,
    month: &str,
    amount: f64,
) -> Result<()> {
    let budget = db.create_budget(
        user_id,
        &NewBudget {
            category: category.to_string(),
            month: month.to_string(),
            allocated: amount,
        },
    )?;

    println!(
        "✅ Budget {} for {} in {}: {}",
        budget.id,
        budget.category,
        budget.month,
        money(budget.allocated)
    );
    Ok(())
}

pub fn cmd_budgets_delete(db: &Database, id: i64) -> Result<()> {
    if !db.delete_budget(id)? {
        bail!("Budget {} not found", id);
    }

    println!("🗑️  Deleted budget {}", id);
    Ok(())
}
