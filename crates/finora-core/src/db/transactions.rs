//! Transaction CRUD
//!
//! Every write here also adjusts the owning account's balance, and both
//! statements run in one SQLite transaction so readers never see one
//! without the other.

use chrono::Utc;
use rusqlite::{params, params_from_iter, OptionalExtension};

use super::{format_date, parse_date, parse_datetime, parse_enum, Database, DbConn};
use crate::analytics::MonthRange;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionUpdate};

const TRANSACTION_COLUMNS: &str =
    "id, user_id, account_id, amount, description, category, direction, date, notes, created_at";

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let direction_str: String = row.get(6)?;
    let date_str: String = row.get(7)?;
    let created_at_str: String = row.get(9)?;
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_id: row.get(2)?,
        amount: row.get(3)?,
        description: row.get(4)?,
        category: row.get(5)?,
        direction: parse_enum(6, &direction_str)?,
        date: parse_date(7, &date_str)?,
        notes: row.get(8)?,
        created_at: parse_datetime(&created_at_str),
    })
}

fn fetch_transaction(conn: &DbConn, id: i64) -> Result<Option<Transaction>> {
    let tx = conn
        .query_row(
            &format!(
                "SELECT {} FROM transactions WHERE id = ?",
                TRANSACTION_COLUMNS
            ),
            params![id],
            row_to_transaction,
        )
        .optional()?;
    Ok(tx)
}

fn adjust_balance(conn: &DbConn, account_id: i64, delta: f64) -> Result<()> {
    let changed = conn.execute(
        "UPDATE accounts SET balance = balance + ? WHERE id = ?",
        params![delta, account_id],
    )?;
    if changed == 0 {
        return Err(Error::NotFound(format!("Account {}", account_id)));
    }
    Ok(())
}

/// Filters for listing a user's transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub month: Option<MonthRange>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl Database {
    /// Insert a transaction and apply it to the account balance
    ///
    /// `category` is the already-resolved category name. The account must
    /// belong to `user_id`.
    pub fn create_transaction(
        &self,
        user_id: i64,
        tx: &NewTransaction,
        category: &str,
    ) -> Result<Transaction> {
        tx.validate()?;
        self.require_user(user_id)?;
        let date = tx.date.unwrap_or_else(|| Utc::now().date_naive());

        self.with_transaction(|conn| {
            let owner: Option<i64> = conn
                .query_row(
                    "SELECT user_id FROM accounts WHERE id = ?",
                    params![tx.account_id],
                    |row| row.get(0),
                )
                .optional()?;
            if owner != Some(user_id) {
                return Err(Error::NotFound(format!("Account {}", tx.account_id)));
            }

            conn.execute(
                r#"
                INSERT INTO transactions
                    (user_id, account_id, amount, description, category, direction, date, notes)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
                params![
                    user_id,
                    tx.account_id,
                    tx.amount,
                    tx.description.trim(),
                    category,
                    tx.direction.as_str(),
                    format_date(date),
                    tx.notes,
                ],
            )?;
            let id = conn.last_insert_rowid();

            adjust_balance(conn, tx.account_id, tx.direction.signed(tx.amount))?;

            fetch_transaction(conn, id)?
                .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))
        })
    }

    /// Get a transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        fetch_transaction(&conn, id)
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(
        &self,
        user_id: i64,
        query: &TransactionQuery,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;

        let mut sql = format!(
            "SELECT {} FROM transactions WHERE user_id = ?",
            TRANSACTION_COLUMNS
        );
        let mut args: Vec<rusqlite::types::Value> = vec![user_id.into()];

        if let Some(ref month) = query.month {
            sql.push_str(" AND date >= ? AND date < ?");
            args.push(format_date(month.start()).into());
            args.push(format_date(month.end()).into());
        }
        if let Some(ref category) = query.category {
            sql.push_str(" AND category = ? COLLATE NOCASE");
            args.push(category.clone().into());
        }
        sql.push_str(" ORDER BY date DESC, id DESC");
        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            args.push(limit.into());
        }

        let mut stmt = conn.prepare(&sql)?;
        let transactions = stmt
            .query_map(params_from_iter(args), row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Apply a partial update, moving the balance effect accordingly
    ///
    /// Returns None when the transaction does not exist.
    pub fn update_transaction(
        &self,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Option<Transaction>> {
        update.validate()?;

        self.with_transaction(|conn| {
            let Some(existing) = fetch_transaction(conn, id)? else {
                return Ok(None);
            };

            let amount = update.amount.unwrap_or(existing.amount);
            let direction = update.direction.unwrap_or(existing.direction);
            let description = update
                .description
                .as_deref()
                .map(str::trim)
                .unwrap_or(&existing.description)
                .to_string();
            let category = update
                .category
                .as_deref()
                .map(str::trim)
                .unwrap_or(&existing.category)
                .to_string();
            let date = update.date.unwrap_or(existing.date);
            let notes = update.notes.clone().or(existing.notes.clone());

            conn.execute(
                r#"
                UPDATE transactions
                SET amount = ?, description = ?, category = ?, direction = ?, date = ?, notes = ?
                WHERE id = ?
                "#,
                params![
                    amount,
                    description,
                    category,
                    direction.as_str(),
                    format_date(date),
                    notes,
                    id
                ],
            )?;

            let delta = direction.signed(amount) - existing.direction.signed(existing.amount);
            if delta != 0.0 {
                adjust_balance(conn, existing.account_id, delta)?;
            }

            fetch_transaction(conn, id)
        })
    }

    /// Delete a transaction and reverse its balance effect
    ///
    /// Returns false when the transaction does not exist.
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        self.with_transaction(|conn| {
            let Some(existing) = fetch_transaction(conn, id)? else {
                return Ok(false);
            };

            conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
            adjust_balance(
                conn,
                existing.account_id,
                -existing.direction.signed(existing.amount),
            )?;

            Ok(true)
        })
    }
}
