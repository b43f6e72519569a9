//! Savings goal command implementations

use anyhow::{bail, Context, Result};
use chrono::Utc;
use finora_core::db::Database;
use finora_core::models::{GoalUpdate, NewGoal};
use finora_core::{goal_progress, GoalStatus};

use super::{money, truncate};

pub fn cmd_goals_list(db: &Database, user_id: i64) -> Result<()> {
    db.require_user(user_id)?;
    let goals = db.list_goals(user_id)?;

    if goals.is_empty() {
        println!("No goals yet.");
        return Ok(());
    }

    let today = Utc::now().date_naive();

    println!();
    println!("🎯 Goals");
    println!("   ─────────────────────────────────────────────────────────");
    for goal in goals {
        let progress = goal_progress(&goal, today);
        let marker = match progress.status {
            GoalStatus::Completed => "✅",
            GoalStatus::Healthy => "🟢",
            GoalStatus::Warning => "🟡",
            GoalStatus::Critical => "🔴",
        };
        println!(
            "   {:>4} │ {} {:<20} │ {:>10} of {:>10} ({:.0}%) {}",
            goal.id,
            goal.glyph,
            truncate(&goal.name, 20),
            money(goal.current_amount),
            money(goal.target_amount),
            progress.progress_percent,
            marker
        );
        if let Some(days) = progress.days_remaining {
            println!(
                "        {} days left, {} per day needed",
                days,
                money(progress.required_per_day)
            );
        }
    }

    Ok(())
}

pub fn cmd_goals_add(db: &Database, user_id: i64, goal: &NewGoal) -> Result<()> {
    let goal = db.create_goal(user_id, goal)?;

    println!(
        "✅ Created goal {} '{}' with target {}",
        goal.id,
        goal.name,
        money(goal.target_amount)
    );
    Ok(())
}

pub fn cmd_goals_contribute(db: &Database, id: i64, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("Contribution must be a positive number");
    }

    let goal = db
        .get_goal(id)?
        .with_context(|| format!("Goal {} not found", id))?;

    let update = GoalUpdate {
        current_amount: Some(goal.current_amount + amount),
        ..Default::default()
    };
    let goal = db
        .update_goal(id, &update)?
        .with_context(|| format!("Goal {} not found", id))?;

    let progress = goal_progress(&goal, Utc::now().date_naive());
    println!(
        "💰 Added {} to '{}': {} of {} ({:.0}%)",
        money(amount),
        goal.name,
        money(goal.current_amount),
        money(goal.target_amount),
        progress.progress_percent
    );
    if progress.status == GoalStatus::Completed {
        println!("🎉 Goal reached!");
    }

    Ok(())
}

pub fn cmd_goals_delete(db: &Database, id: i64) -> Result<()> {
    if !db.delete_goal(id)? {
        bail!("Goal {} not found", id);
    }

    println!("🗑️  Deleted goal {}", id);
    Ok(())
}
