//! Ledger reads for the spending analyzer

use tracing::debug;

use super::{Database, TransactionQuery};
use crate::analytics::{analyze_period, AnalyticsSnapshot, BudgetLimit, Income, LedgerEntry, MonthRange};
use crate::error::Result;

impl Database {
    /// Build a user's monthly snapshot from stored transactions and budgets
    ///
    /// With `declared_income` the ratios use that figure; otherwise they use
    /// the month's income transactions.
    pub fn monthly_analytics(
        &self,
        user_id: i64,
        month: &MonthRange,
        declared_income: Option<f64>,
    ) -> Result<AnalyticsSnapshot> {
        self.require_user(user_id)?;

        let transactions = self.list_transactions(
            user_id,
            &TransactionQuery {
                month: Some(*month),
                ..Default::default()
            },
        )?;
        let budgets = self.list_budgets(user_id, Some(month))?;

        debug!(
            user_id,
            month = %month,
            transactions = transactions.len(),
            budgets = budgets.len(),
            "Running monthly analytics"
        );

        let entries: Vec<LedgerEntry> = transactions.iter().map(LedgerEntry::from).collect();
        let limits: Vec<BudgetLimit> = budgets.iter().map(BudgetLimit::from).collect();
        let income = match declared_income {
            Some(x) => Income::Declared(x),
            None => Income::FromTransactions,
        };

        Ok(analyze_period(month, &entries, income, &limits))
    }
}
