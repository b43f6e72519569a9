//! Account operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, parse_enum, Database};
use crate::error::{Error, Result};
use crate::models::{Account, NewAccount};

const ACCOUNT_COLUMNS: &str = "id, user_id, name, account_type, balance, created_at";

fn row_to_account(row: &rusqlite::Row) -> rusqlite::Result<Account> {
    let account_type_str: String = row.get(3)?;
    let created_at_str: String = row.get(5)?;
    Ok(Account {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        account_type: parse_enum(3, &account_type_str)?,
        balance: row.get(4)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Create an account for a user
    pub fn create_account(&self, user_id: i64, account: &NewAccount) -> Result<Account> {
        account.validate()?;
        self.require_user(user_id)?;

        let id = {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO accounts (user_id, name, account_type, balance) VALUES (?, ?, ?, ?)",
                params![
                    user_id,
                    account.name.trim(),
                    account.account_type.as_str(),
                    account.balance
                ],
            )?;
            conn.last_insert_rowid()
        };

        self.get_account(id)?
            .ok_or_else(|| Error::NotFound(format!("Account {}", id)))
    }

    /// List a user's accounts
    pub fn list_accounts(&self, user_id: i64) -> Result<Vec<Account>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM accounts WHERE user_id = ? ORDER BY name",
            ACCOUNT_COLUMNS
        ))?;

        let accounts = stmt
            .query_map(params![user_id], row_to_account)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    /// Get an account by ID
    pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
        let conn = self.conn()?;
        let account = conn
            .query_row(
                &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
                params![id],
                row_to_account,
            )
            .optional()?;

        Ok(account)
    }
}
