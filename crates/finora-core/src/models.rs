//! Domain models for Finora

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::MonthRange;
use crate::error::{Error, Result};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A money account owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub account_type: AccountType,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// Account types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
    Credit,
    Cash,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
            Self::Cash => "cash",
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" | "current" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit" | "credit_card" => Ok(Self::Credit),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether money left or entered an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Expense,
    Income,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    /// Signed effect of an amount on an account balance
    pub fn signed(&self, amount: f64) -> f64 {
        match self {
            Self::Expense => -amount,
            Self::Income => amount,
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expense" | "debit" => Ok(Self::Expense),
            "income" | "credit" => Ok(Self::Income),
            _ => Err(format!("Unknown transaction direction: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A ledger transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub account_id: i64,
    /// Always non-negative; `direction` carries the sign
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub direction: Direction,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Monthly spending cap for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub user_id: i64,
    pub category: String,
    /// "YYYY-MM"
    pub month: String,
    pub allocated: f64,
    /// Sum of matching expenses, computed on read
    pub spent: f64,
    pub created_at: DateTime<Utc>,
}

/// Goal size; large goals sort first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Large,
    #[default]
    Small,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Small => "small",
        }
    }
}

impl std::str::FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "large" => Ok(Self::Large),
            "small" => Ok(Self::Small),
            _ => Err(format!("Unknown goal priority: {}", s)),
        }
    }
}

impl std::fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A savings goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub glyph: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub priority: GoalPriority,
    pub created_at: DateTime<Utc>,
}

// ========== Request payloads ==========

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidData(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidData(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        require_text("username", &self.username)?;
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(Error::InvalidData(format!("Invalid email: {}", self.email))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub balance: f64,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        if !self.balance.is_finite() {
            return Err(Error::InvalidData("balance must be a number".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub account_id: i64,
    pub amount: f64,
    pub description: String,
    /// Explicit category; classified from the description when absent
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub direction: Direction,
    /// Defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        require_amount("amount", self.amount)?;
        require_text("description", &self.description)
    }
}

/// Partial transaction update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionUpdate {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub direction: Option<Direction>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl TransactionUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(amount) = self.amount {
            require_amount("amount", amount)?;
        }
        if let Some(ref description) = self.description {
            require_text("description", description)?;
        }
        if let Some(ref category) = self.category {
            require_text("category", category)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub month: String,
    pub allocated: f64,
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        require_text("category", &self.category)?;
        self.month.parse::<MonthRange>()?;
        require_amount("allocated", self.allocated)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetUpdate {
    pub allocated: Option<f64>,
    pub category: Option<String>,
    pub month: Option<String>,
}

impl BudgetUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(allocated) = self.allocated {
            require_amount("allocated", allocated)?;
        }
        if let Some(ref category) = self.category {
            require_text("category", category)?;
        }
        if let Some(ref month) = self.month {
            month.parse::<MonthRange>()?;
        }
        Ok(())
    }
}

pub const DEFAULT_GOAL_GLYPH: &str = "🎯";

fn default_goal_glyph() -> String {
    DEFAULT_GOAL_GLYPH.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewGoal {
    pub name: String,
    #[serde(default = "default_goal_glyph")]
    pub glyph: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: GoalPriority,
}

impl NewGoal {
    pub fn validate(&self) -> Result<()> {
        require_text("name", &self.name)?;
        require_amount("target_amount", self.target_amount)?;
        if self.target_amount == 0.0 {
            return Err(Error::InvalidData("target_amount must be positive".into()));
        }
        require_amount("current_amount", self.current_amount)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub glyph: Option<String>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub deadline: Option<NaiveDate>,
    pub priority: Option<GoalPriority>,
}

impl GoalUpdate {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.name {
            require_text("name", name)?;
        }
        if let Some(target) = self.target_amount {
            require_amount("target_amount", target)?;
            if target == 0.0 {
                return Err(Error::InvalidData("target_amount must be positive".into()));
            }
        }
        if let Some(current) = self.current_amount {
            require_amount("current_amount", current)?;
        }
        Ok(())
    }
}
