//! Savings goal operations

use rusqlite::{params, OptionalExtension};

use super::{format_date, parse_date, parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{Goal, GoalUpdate, NewGoal};

const GOAL_COLUMNS: &str =
    "id, user_id, name, glyph, target_amount, current_amount, deadline, priority, created_at";

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    let deadline_str: Option<String> = row.get(6)?;
    let priority_str: String = row.get(7)?;
    let created_at_str: String = row.get(8)?;
    Ok(Goal {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        glyph: row.get(3)?,
        target_amount: row.get(4)?,
        current_amount: row.get(5)?,
        deadline: deadline_str.map(|s| parse_date(6, &s)).transpose()?,
        priority: parse_enum(7, &priority_str)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create a savings goal
    pub fn create_goal(&self, user_id: i64, goal: &NewGoal) -> Result<Goal> {
        goal.validate()?;
        self.require_user(user_id)?;

        let id = {
            let conn = self.conn()?;
            conn.execute(
                r#"
                INSERT INTO goals (user_id, name, glyph, target_amount, current_amount, deadline, priority)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    goal.name.trim(),
                    goal.glyph,
                    goal.target_amount,
                    goal.current_amount,
                    goal.deadline.map(format_date),
                    goal.priority.as_str(),
                ],
            )?;
            conn.last_insert_rowid()
        };

        self.get_goal(id)?
            .ok_or_else(|| Error::NotFound(format!("Goal {}", id)))
    }

    /// Get a goal by ID
    pub fn get_goal(&self, id: i64) -> Result<Option<Goal>> {
        let conn = self.conn()?;
        let goal = conn
            .query_row(
                &format!("SELECT {} FROM goals WHERE id = ?", GOAL_COLUMNS),
                params![id],
                row_to_goal,
            )
            .optional()?;
        Ok(goal)
    }

    /// List a user's goals: large first, then by nearest deadline
    pub fn list_goals(&self, user_id: i64) -> Result<Vec<Goal>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM goals
            WHERE user_id = ?
            ORDER BY CASE priority WHEN 'large' THEN 0 ELSE 1 END,
                     deadline IS NULL, deadline, id
            "#,
            GOAL_COLUMNS
        ))?;
        let goals = stmt
            .query_map(params![user_id], row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Apply a partial update; returns None when the goal does not exist
    pub fn update_goal(&self, id: i64, update: &GoalUpdate) -> Result<Option<Goal>> {
        update.validate()?;
        let Some(existing) = self.get_goal(id)? else {
            return Ok(None);
        };

        let name = update
            .name
            .as_deref()
            .map(|s| s.trim().to_string())
            .unwrap_or(existing.name);
        let glyph = update.glyph.clone().unwrap_or(existing.glyph);
        let target_amount = update.target_amount.unwrap_or(existing.target_amount);
        let current_amount = update.current_amount.unwrap_or(existing.current_amount);
        let deadline = update.deadline.or(existing.deadline);
        let priority = update.priority.unwrap_or(existing.priority);

        {
            let conn = self.conn()?;
            conn.execute(
                r#"
                UPDATE goals
                SET name = ?, glyph = ?, target_amount = ?, current_amount = ?, deadline = ?, priority = ?
                WHERE id = ?
                "#,
                params![
                    name,
                    glyph,
                    target_amount,
                    current_amount,
                    deadline.map(format_date),
                    priority.as_str(),
                    id
                ],
            )?;
        }

        self.get_goal(id)
    }

    /// Delete a goal; returns false when it did not exist
    pub fn delete_goal(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM goals WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }
}
