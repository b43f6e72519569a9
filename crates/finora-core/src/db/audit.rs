//! Audit log of API access

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter};
use serde::Serialize;

use super::{parse_datetime, Database};
use crate::error::Result;

/// Default number of entries returned when no limit is given
pub const DEFAULT_AUDIT_LIMIT: i64 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
}

/// Filters for reading the audit log; unset fields match everything
#[derive(Debug, Clone)]
pub struct AuditFilter {
    pub actor: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub limit: i64,
}

impl Default for AuditFilter {
    fn default() -> Self {
        Self {
            actor: None,
            entity_type: None,
            entity_id: None,
            limit: DEFAULT_AUDIT_LIMIT,
        }
    }
}

impl AuditFilter {
    pub fn with_limit(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

impl Database {
    /// Record one API action
    pub fn log_audit(
        &self,
        actor: &str,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<i64>,
        details: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO audit_log (actor, action, entity_type, entity_id, details) VALUES (?, ?, ?, ?, ?)",
            params![actor, action, entity_type, entity_id, details],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Matching audit entries, newest first
    pub fn list_audit_log(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>> {
        let conn = self.conn()?;

        let mut clauses: Vec<&str> = Vec::new();
        let mut args: Vec<rusqlite::types::Value> = Vec::new();
        if let Some(ref actor) = filter.actor {
            clauses.push("actor = ?");
            args.push(actor.clone().into());
        }
        if let Some(ref entity_type) = filter.entity_type {
            clauses.push("entity_type = ?");
            args.push(entity_type.clone().into());
        }
        if let Some(entity_id) = filter.entity_id {
            clauses.push("entity_id = ?");
            args.push(entity_id.into());
        }
        args.push(filter.limit.max(0).into());

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT id, timestamp, actor, action, entity_type, entity_id, details \
             FROM audit_log {} ORDER BY timestamp DESC, id DESC LIMIT ?",
            where_sql
        );

        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params_from_iter(args), |row| {
                let timestamp: String = row.get(1)?;
                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp: parse_datetime(&timestamp),
                    actor: row.get(2)?,
                    action: row.get(3)?,
                    entity_type: row.get(4)?,
                    entity_id: row.get(5)?,
                    details: row.get(6)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }
}
