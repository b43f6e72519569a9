//! Budget operations
//!
//! `spent` is never stored. It is summed from expense transactions in the
//! budget's category and month each time a budget is read.

use rusqlite::{params, OptionalExtension};

use super::{is_unique_violation, parse_datetime, Database};
use crate::analytics::MonthRange;
use crate::categories;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetUpdate, NewBudget};

const BUDGET_SELECT: &str = r#"
    SELECT b.id, b.user_id, b.category, b.month, b.allocated, b.created_at,
           COALESCE((
               SELECT SUM(t.amount) FROM transactions t
               WHERE t.user_id = b.user_id
                 AND t.category = b.category
                 AND t.direction = 'expense'
                 AND t.date >= b.month || '-01'
                 AND t.date < date(b.month || '-01', '+1 month')
           ), 0) AS spent
    FROM budgets b
"#;

fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
    let created_at_str: String = row.get(5)?;
    Ok(Budget {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category: row.get(2)?,
        month: row.get(3)?,
        allocated: row.get(4)?,
        spent: row.get(6)?,
        created_at: parse_datetime(&created_at_str),
    })
}

/// Table rows are stored under their canonical spelling
fn canonical_category(name: &str) -> String {
    categories::find(name)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| name.trim().to_string())
}

fn conflict_on_unique(e: rusqlite::Error) -> Error {
    if is_unique_violation(&e) {
        Error::Conflict("A budget for this category and month already exists".into())
    } else {
        Error::Database(e)
    }
}

impl Database {
    /// Create a budget for one category and month
    pub fn create_budget(&self, user_id: i64, budget: &NewBudget) -> Result<Budget> {
        budget.validate()?;
        self.require_user(user_id)?;
        let month: MonthRange = budget.month.parse()?;

        let id = {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO budgets (user_id, category, month, allocated) VALUES (?, ?, ?, ?)",
                params![
                    user_id,
                    canonical_category(&budget.category),
                    month.label(),
                    budget.allocated
                ],
            )
            .map_err(conflict_on_unique)?;
            conn.last_insert_rowid()
        };

        self.get_budget(id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {}", id)))
    }

    /// Get a budget by ID
    pub fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!("{} WHERE b.id = ?", BUDGET_SELECT),
                params![id],
                row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// List a user's budgets, optionally for one month
    pub fn list_budgets(&self, user_id: i64, month: Option<&MonthRange>) -> Result<Vec<Budget>> {
        let conn = self.conn()?;

        let budgets = match month {
            Some(m) => {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE b.user_id = ? AND b.month = ? ORDER BY b.category",
                    BUDGET_SELECT
                ))?;
                let rows = stmt
                    .query_map(params![user_id, m.label()], row_to_budget)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "{} WHERE b.user_id = ? ORDER BY b.month DESC, b.category",
                    BUDGET_SELECT
                ))?;
                let rows = stmt
                    .query_map(params![user_id], row_to_budget)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                rows
            }
        };

        Ok(budgets)
    }

    /// Apply a partial update; returns None when the budget does not exist
    pub fn update_budget(&self, id: i64, update: &BudgetUpdate) -> Result<Option<Budget>> {
        update.validate()?;
        let Some(existing) = self.get_budget(id)? else {
            return Ok(None);
        };

        let category = update
            .category
            .as_deref()
            .map(canonical_category)
            .unwrap_or(existing.category);
        let month = match update.month {
            Some(ref m) => m.parse::<MonthRange>()?.label(),
            None => existing.month,
        };
        let allocated = update.allocated.unwrap_or(existing.allocated);

        {
            let conn = self.conn()?;
            conn.execute(
                "UPDATE budgets SET category = ?, month = ?, allocated = ? WHERE id = ?",
                params![category, month, allocated, id],
            )
            .map_err(conflict_on_unique)?;
        }

        self.get_budget(id)
    }

    /// Delete a budget; returns false when it did not exist
    pub fn delete_budget(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM budgets WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }
}
