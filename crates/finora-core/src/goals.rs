//! Savings goal progress

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Goal;

/// Progress share, below which a lagging goal is critical rather than warning
const WARNING_FLOOR_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Completed,
    Healthy,
    Warning,
    Critical,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: i64,
    /// Capped at 100
    pub progress_percent: f64,
    pub amount_remaining: f64,
    /// None without a deadline; 0 once the deadline has passed
    pub days_remaining: Option<i64>,
    /// Daily saving needed to hit the deadline, 0 when no days remain
    pub required_per_day: f64,
    pub status: GoalStatus,
}

/// Compute a goal's progress as of `today`
///
/// A goal with a deadline is on track when its current amount is at least the
/// straight-line expectation between its creation date and the deadline.
pub fn goal_progress(goal: &Goal, today: NaiveDate) -> GoalProgress {
    let raw_percent = if goal.target_amount > 0.0 {
        goal.current_amount / goal.target_amount * 100.0
    } else {
        100.0
    };
    let progress_percent = raw_percent.clamp(0.0, 100.0);
    let amount_remaining = (goal.target_amount - goal.current_amount).max(0.0);

    let days_remaining = goal
        .deadline
        .map(|deadline| (deadline - today).num_days().max(0));

    let required_per_day = match days_remaining {
        Some(days) if days > 0 => amount_remaining / days as f64,
        _ => 0.0,
    };

    let on_track = match goal.deadline {
        None => true,
        Some(deadline) => {
            let created = goal.created_at.date_naive();
            let total_days = (deadline - created).num_days();
            if total_days <= 0 {
                false
            } else {
                let elapsed = (today - created).num_days().clamp(0, total_days);
                let expected = goal.target_amount * elapsed as f64 / total_days as f64;
                goal.current_amount >= expected
            }
        }
    };

    let status = if raw_percent >= 100.0 {
        GoalStatus::Completed
    } else if on_track {
        GoalStatus::Healthy
    } else if progress_percent >= WARNING_FLOOR_PERCENT {
        GoalStatus::Warning
    } else {
        GoalStatus::Critical
    };

    GoalProgress {
        goal_id: goal.id,
        progress_percent,
        amount_remaining,
        days_remaining,
        required_per_day,
        status,
    }
}
