//! 50/30/20 budget allocation

use serde::{Deserialize, Serialize};

pub const RULE_NAME: &str = "50/30/20 Rule";
pub const NEEDS_SHARE: f64 = 0.50;
pub const WANTS_SHARE: f64 = 0.30;
pub const SAVINGS_SHARE: f64 = 0.20;

/// Round to cents, halves away from zero
///
/// For the non-negative amounts handled here this is round-half-up.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A value per 50/30/20 bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Buckets {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

impl Buckets {
    pub fn total(&self) -> f64 {
        self.needs + self.wants + self.savings
    }
}

/// Example categories listed under each bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketExamples {
    pub needs: Vec<String>,
    pub wants: Vec<String>,
    pub savings: Vec<String>,
}

/// Recommended allocation for a monthly income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAdvice {
    pub rule: String,
    pub description: String,
    pub monthly_income: f64,
    pub percentages: Buckets,
    pub amounts: Buckets,
    pub categories: BucketExamples,
}

fn examples(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Split an income by the 50/30/20 rule
///
/// Income that is zero, negative or not a number yields all-zero amounts.
/// Rejecting such input is the caller's job.
pub fn allocate(monthly_income: f64) -> BudgetAdvice {
    let income = if monthly_income > 0.0 {
        monthly_income
    } else {
        0.0
    };

    BudgetAdvice {
        rule: RULE_NAME.to_string(),
        description: "Allocate 50% to needs, 30% to wants, and 20% to savings".to_string(),
        monthly_income: round_cents(income),
        percentages: Buckets {
            needs: NEEDS_SHARE,
            wants: WANTS_SHARE,
            savings: SAVINGS_SHARE,
        },
        amounts: Buckets {
            needs: round_cents(income * NEEDS_SHARE),
            wants: round_cents(income * WANTS_SHARE),
            savings: round_cents(income * SAVINGS_SHARE),
        },
        categories: BucketExamples {
            needs: examples(&["Rent", "Groceries", "Utilities", "Insurance", "Transportation"]),
            wants: examples(&["Dining", "Entertainment", "Shopping", "Hobbies", "Vacation"]),
            savings: examples(&[
                "Emergency Fund",
                "Investments",
                "Debt Payoff",
                "Financial Goals",
            ]),
        },
    }
}
