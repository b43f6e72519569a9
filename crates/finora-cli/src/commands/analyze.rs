//! Monthly analysis command

use anyhow::{bail, Context, Result};
use finora_core::analytics::{BudgetLevel, IncomeBasis, MonthRange};
use finora_core::db::Database;

use super::money;

pub fn cmd_analyze(
    db: &Database,
    user_id: i64,
    month: Option<&str>,
    income: Option<f64>,
    json: bool,
) -> Result<()> {
    let month = match month {
        Some(m) => m.parse::<MonthRange>()?,
        None => MonthRange::current(),
    };
    if let Some(value) = income {
        if !value.is_finite() || value < 0.0 {
            bail!("Income must be a non-negative number");
        }
    }

    let snapshot = db
        .monthly_analytics(user_id, &month, income)
        .context("Failed to analyze spending")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let basis = match snapshot.income_basis {
        IncomeBasis::Declared => "declared",
        IncomeBasis::Transactions => "from transactions",
    };

    println!();
    println!("📊 Spending for {}", month);
    println!("   ─────────────────────────────────────");
    println!(
        "   Income:    {:>12} ({})",
        money(snapshot.monthly_income),
        basis
    );
    println!("   Spent:     {:>12}", money(snapshot.total_spent));
    println!("   Remaining: {:>12}", money(snapshot.remaining));
    println!("   Used:      {:>11.1}%", snapshot.spending_percent);

    if !snapshot.spending_by_category.is_empty() {
        println!();
        println!("   By category:");
        for c in &snapshot.spending_by_category {
            println!(
                "   {} {:<15} {:>12} {:>6.1}%  ({} txns, {:?})",
                c.glyph,
                c.category,
                money(c.amount),
                c.percentage,
                c.transaction_count,
                c.trend
            );
        }
    }

    if !snapshot.budget_status.is_empty() {
        println!();
        println!("   Budgets:");
        for b in &snapshot.budget_status {
            let marker = match b.level {
                BudgetLevel::Healthy => "🟢",
                BudgetLevel::Warning => "🟡",
                BudgetLevel::Critical => "🟠",
                BudgetLevel::Exceeded => "🔴",
            };
            println!(
                "   {} {:<15} {:>12} of {:>12} ({:.0}%)",
                marker,
                b.category,
                money(b.spent),
                money(b.allocated),
                b.percent_used
            );
        }
    }

    if !snapshot.insights.is_empty() {
        println!();
        for insight in &snapshot.insights {
            println!("   {}", insight);
        }
    }

    println!();
    println!("   {}", snapshot.recommendation_message);

    Ok(())
}
