//! User operations

use rusqlite::{params, OptionalExtension};

use super::{is_unique_violation, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewUser, User};

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    let created_at_str: String = row.get(3)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created_at: parse_datetime(&created_at_str),
    })
}

impl Database {
    /// Register a user; emails are unique (case-insensitive)
    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        user.validate()?;
        let email = user.email.trim().to_lowercase();

        if self.get_user_by_email(&email)?.is_some() {
            return Err(Error::Conflict("Email already registered".into()));
        }

        let id = {
            let conn = self.conn()?;
            conn.execute(
                "INSERT INTO users (username, email) VALUES (?, ?)",
                params![user.username.trim(), email],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::Conflict("Email already registered".into())
                } else {
                    Error::Database(e)
                }
            })?;
            conn.last_insert_rowid()
        };

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, created_at FROM users WHERE id = ?",
                params![id],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// Get a user by email
    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, email, created_at FROM users WHERE email = ?",
                params![email.trim().to_lowercase()],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    /// List all users
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, username, email, created_at FROM users ORDER BY id")?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    /// Fail with `NotFound` unless the user exists
    pub fn require_user(&self, id: i64) -> Result<User> {
        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }
}
