//! Spending analyzer
//!
//! Turns a set of categorized transactions, an income figure and per-category
//! budgets into a snapshot: totals, a per-category breakdown, budget status
//! and insight strings. Everything here is a pure function of its inputs;
//! budget `spent` values are recomputed from the transactions rather than
//! trusted from storage.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::allocator::round_cents;
use crate::categories::{self, CategoryGroup};
use crate::error::{Error, Result};
use crate::models::{Budget, Direction, Transaction};

/// Spending share of income above which the overspending alert fires
pub const OVERSPEND_PERCENT: f64 = 100.0;

/// Spending share of income above which the "90%+" warning fires
pub const HIGH_SPEND_PERCENT: f64 = 90.0;

/// Share of income above which a single category is called out
pub const HIGH_CATEGORY_PERCENT: f64 = 35.0;

/// Budget usage above which the "approaching limit" insight fires
pub const APPROACHING_BUDGET_PERCENT: f64 = 80.0;

/// Spending share at or below which the month is "on track"
pub const ON_TRACK_PERCENT: f64 = 80.0;

// ========== Month ranges ==========

/// A calendar month as the half-open range `[first, first_of_next)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthRange {
    year: i32,
    month: u32,
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthRange {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}-{:02}", year, month)))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or_else(|| Error::InvalidData(format!("Invalid month: {}-{:02}", year, month)))?;
        Ok(Self {
            year,
            month,
            start,
            end,
        })
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            year: date.year(),
            month: date.month(),
            start,
            end,
        }
    }

    /// The current UTC month
    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    /// First day of the month (inclusive)
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day of the next month (exclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// "YYYY-MM"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidData(format!("Invalid month '{}', expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4
            || month.len() != 2
            || !year.chars().all(|c| c.is_ascii_digit())
            || !month.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Self::new(year, month)
    }
}

impl std::fmt::Display for MonthRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ========== Inputs ==========

/// A transaction as the analyzer sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub amount: f64,
    pub description: String,
    pub direction: Direction,
    pub date: NaiveDate,
    pub category: String,
}

impl From<&Transaction> for LedgerEntry {
    fn from(tx: &Transaction) -> Self {
        Self {
            amount: tx.amount,
            description: tx.description.clone(),
            direction: tx.direction,
            date: tx.date,
            category: tx.category.clone(),
        }
    }
}

/// A category's allocated amount for the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLimit {
    pub category: String,
    pub allocated: f64,
}

impl From<&Budget> for BudgetLimit {
    fn from(b: &Budget) -> Self {
        Self {
            category: b.category.clone(),
            allocated: b.allocated,
        }
    }
}

/// Which income figure spending ratios are computed against
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Income {
    /// A user-declared monthly income
    Declared(f64),
    /// The sum of income transactions in the period
    FromTransactions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeBasis {
    Declared,
    Transactions,
}

// ========== Outputs ==========

/// Direction of a category's spending within the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: String,
    pub group: CategoryGroup,
    pub amount: f64,
    /// Share of total spending, 0 when nothing was spent
    pub percentage: f64,
    pub glyph: String,
    pub color: String,
    pub transaction_count: usize,
    pub trend: Trend,
}

/// How close a budget is to its allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Healthy,
    Warning,
    Critical,
    Exceeded,
}

impl BudgetLevel {
    pub fn from_percent_used(percent_used: f64) -> Self {
        if percent_used >= 100.0 {
            Self::Exceeded
        } else if percent_used >= 90.0 {
            Self::Critical
        } else if percent_used >= 70.0 {
            Self::Warning
        } else {
            Self::Healthy
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub category: String,
    pub allocated: f64,
    pub spent: f64,
    pub remaining: f64,
    pub percent_used: f64,
    pub level: BudgetLevel,
}

/// Serialized with the same labels as [`Recommendation::as_str`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "on track")]
    OnTrack,
    #[serde(rename = "needs attention")]
    NeedsAttention,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnTrack => "on track",
            Self::NeedsAttention => "needs attention",
        }
    }

    /// Display text for the label
    pub fn message(&self) -> &'static str {
        match self {
            Self::OnTrack => "On track! 🎉",
            Self::NeedsAttention => "Needs attention",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derived monthly view of a ledger; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub month: Option<String>,
    pub income_basis: IncomeBasis,
    /// The income figure ratios were computed against
    pub monthly_income: f64,
    /// Sum of income transactions, whatever the basis
    pub total_income: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub spending_percent: f64,
    pub spending_by_category: Vec<CategorySpending>,
    pub budget_status: Vec<BudgetStatus>,
    pub insights: Vec<String>,
    pub recommendation: Recommendation,
    pub recommendation_message: String,
}

// ========== Analysis ==========

#[derive(Default)]
struct CategoryAcc {
    amount: f64,
    entries: Vec<(NaiveDate, f64)>,
}

/// Compare the mean of the later half of a category's expenses to the earlier half
fn trend(entries: &[(NaiveDate, f64)]) -> Trend {
    if entries.len() < 2 {
        return Trend::Stable;
    }
    let mut sorted = entries.to_vec();
    // Stable sort keeps input order for same-day entries
    sorted.sort_by_key(|(date, _)| *date);

    let mid = sorted.len() / 2;
    let mean = |xs: &[(NaiveDate, f64)]| xs.iter().map(|(_, a)| a).sum::<f64>() / xs.len() as f64;
    let first = mean(&sorted[..mid]);
    let second = mean(&sorted[mid..]);

    if second > first * 1.1 {
        Trend::Increasing
    } else if second < first * 0.9 {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

/// Analyze a set of transactions against an income and budgets
///
/// All degenerate inputs (no transactions, zero income, zero allocations)
/// produce zero-valued fields rather than errors. Categories are ordered by
/// amount descending then name; budgets keep their input order.
pub fn analyze(
    entries: &[LedgerEntry],
    income: Income,
    budgets: &[BudgetLimit],
) -> AnalyticsSnapshot {
    let mut total_income = 0.0;
    let mut total_spent = 0.0;
    let mut by_category: BTreeMap<&str, CategoryAcc> = BTreeMap::new();

    for entry in entries {
        match entry.direction {
            Direction::Income => total_income += entry.amount,
            Direction::Expense => {
                total_spent += entry.amount;
                let acc = by_category.entry(entry.category.as_str()).or_default();
                acc.amount += entry.amount;
                acc.entries.push((entry.date, entry.amount));
            }
        }
    }

    let (income_basis, monthly_income) = match income {
        Income::Declared(x) => (IncomeBasis::Declared, if x.is_finite() { x } else { 0.0 }),
        Income::FromTransactions => (IncomeBasis::Transactions, total_income),
    };

    let spending_percent = percent_of(total_spent, monthly_income);

    let mut spending_by_category: Vec<CategorySpending> = by_category
        .iter()
        .map(|(name, acc)| CategorySpending {
            category: name.to_string(),
            group: categories::group_for(name),
            amount: acc.amount,
            percentage: percent_of(acc.amount, total_spent),
            glyph: categories::glyph_for(name).to_string(),
            color: categories::color_for(name).to_string(),
            transaction_count: acc.entries.len(),
            trend: trend(&acc.entries),
        })
        .collect();
    spending_by_category.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });

    let mut budget_status: Vec<BudgetStatus> = budgets
        .iter()
        .map(|budget| {
            let spent = by_category
                .get(budget.category.as_str())
                .map(|acc| acc.amount)
                .unwrap_or(0.0);
            let percent_used = percent_of(spent, budget.allocated);
            BudgetStatus {
                category: budget.category.clone(),
                allocated: budget.allocated,
                spent,
                remaining: budget.allocated - spent,
                percent_used,
                level: BudgetLevel::from_percent_used(percent_used),
            }
        })
        .collect();

    let insights = insights(
        spending_percent,
        monthly_income,
        &spending_by_category,
        &budget_status,
    );

    let recommendation = if spending_percent <= ON_TRACK_PERCENT {
        Recommendation::OnTrack
    } else {
        Recommendation::NeedsAttention
    };

    // Levels, insights and the recommendation above saw unrounded values
    for cat in &mut spending_by_category {
        cat.amount = round_cents(cat.amount);
        cat.percentage = round_cents(cat.percentage);
    }
    for status in &mut budget_status {
        status.allocated = round_cents(status.allocated);
        status.spent = round_cents(status.spent);
        status.remaining = round_cents(status.remaining);
        status.percent_used = round_cents(status.percent_used);
    }

    AnalyticsSnapshot {
        month: None,
        income_basis,
        monthly_income: round_cents(monthly_income),
        total_income: round_cents(total_income),
        total_spent: round_cents(total_spent),
        remaining: round_cents(monthly_income - total_spent),
        spending_percent: round_cents(spending_percent),
        spending_by_category,
        budget_status,
        insights,
        recommendation,
        recommendation_message: recommendation.message().to_string(),
    }
}

/// Analyze only the entries dated inside `period`, labelling the snapshot
pub fn analyze_period(
    period: &MonthRange,
    entries: &[LedgerEntry],
    income: Income,
    budgets: &[BudgetLimit],
) -> AnalyticsSnapshot {
    let in_period: Vec<LedgerEntry> = entries
        .iter()
        .filter(|e| period.contains(e.date))
        .cloned()
        .collect();
    let mut snapshot = analyze(&in_period, income, budgets);
    snapshot.month = Some(period.label());
    snapshot
}

/// Insight strings in a fixed order: overall spending, heavy categories,
/// exceeded budgets, nearly-spent budgets
fn insights(
    spending_percent: f64,
    monthly_income: f64,
    spending: &[CategorySpending],
    budgets: &[BudgetStatus],
) -> Vec<String> {
    let mut out = Vec::new();

    if spending_percent > OVERSPEND_PERCENT {
        out.push("🚨 WARNING: You're overspending! Monthly expenses exceed income.".to_string());
    } else if spending_percent > HIGH_SPEND_PERCENT {
        out.push(
            "⚠️ You're spending 90%+ of your income. Consider cutting back on wants.".to_string(),
        );
    }

    if monthly_income > 0.0 {
        for cat in spending {
            let share = cat.amount / monthly_income * 100.0;
            if share > HIGH_CATEGORY_PERCENT {
                out.push(format!(
                    "💡 {} is high ({:.0}% of income). Consider optimization.",
                    cat.category, share
                ));
            }
        }
    }

    for status in budgets {
        if status.percent_used > 100.0 {
            out.push(format!(
                "💡 {} budget exceeded by £{:.2}",
                status.category,
                status.remaining.abs()
            ));
        } else if status.percent_used > APPROACHING_BUDGET_PERCENT {
            out.push(format!("⏰ {} is 80%+ spent", status.category));
        }
    }

    out
}
