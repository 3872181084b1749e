//! Audit log — SQLite-based operation history.
//!
//! Stores a record of every vault operation that changes a credential or
//! exposes its plaintext (create, update, toggle, delete, reveal,
//! consume) in a local SQLite database.  Secret values are never written.
//!
//! Designed for graceful degradation: if the database can't be opened or
//! written to, operations silently continue without logging.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::warn;

use crate::cli::Cli;
use crate::errors::{Result, VaultError};

/// A single audit log entry.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub operation: String,
    pub credential_id: Option<String>,
    pub provider: Option<String>,
    pub environment: Option<String>,
    pub actor: Option<String>,
    pub details: Option<String>,
}

/// What to record for one operation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditEvent<'a> {
    pub operation: &'a str,
    pub credential_id: Option<&'a str>,
    pub provider: Option<&'a str>,
    pub environment: Option<&'a str>,
    pub actor: Option<&'a str>,
    pub details: Option<&'a str>,
}

impl<'a> AuditEvent<'a> {
    pub fn new(operation: &'a str) -> Self {
        Self {
            operation,
            ..Self::default()
        }
    }

    pub fn credential(mut self, id: &'a str) -> Self {
        self.credential_id = Some(id);
        self
    }

    pub fn pair(mut self, provider: &'a str, environment: &'a str) -> Self {
        self.provider = Some(provider);
        self.environment = Some(environment);
        self
    }

    pub fn actor(mut self, actor: Option<&'a str>) -> Self {
        self.actor = actor;
        self
    }

    pub fn details(mut self, details: &'a str) -> Self {
        self.details = Some(details);
        self
    }
}

/// SQLite-backed audit log.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `db_path`.
    ///
    /// Returns `None` if the database can't be opened — callers should
    /// treat this as "audit logging unavailable" and continue normally.
    pub fn open(db_path: &Path) -> Option<Self> {
        let conn = Connection::open(db_path).ok()?;

        // Set restrictive permissions on the audit database (owner-only).
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(db_path, perms);
        }

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS audit_log (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp     TEXT NOT NULL,
                operation     TEXT NOT NULL,
                credential_id TEXT,
                provider      TEXT,
                environment   TEXT,
                actor         TEXT,
                details       TEXT
            );",
        )
        .ok()?;

        Some(Self { conn })
    }

    /// Record an operation. Fire-and-forget — errors are logged and ignored.
    pub fn log(&self, event: &AuditEvent<'_>) {
        let now = Utc::now().to_rfc3339();
        let result = self.conn.execute(
            "INSERT INTO audit_log
                (timestamp, operation, credential_id, provider, environment, actor, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                now,
                event.operation,
                event.credential_id,
                event.provider,
                event.environment,
                event.actor,
                event.details
            ],
        );
        if let Err(e) = result {
            warn!(operation = event.operation, error = %e, "audit write failed");
        }
    }

    /// Query recent audit entries.
    ///
    /// - `limit`: maximum number of entries to return (most recent first).
    /// - `since`: if provided, only return entries newer than this timestamp.
    pub fn query(&self, limit: usize, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let (sql, params): (&str, Vec<Box<dyn rusqlite::types::ToSql>>) = match since {
            Some(ref ts) => (
                "SELECT id, timestamp, operation, credential_id, provider, environment, actor, details
                 FROM audit_log
                 WHERE timestamp >= ?1
                 ORDER BY id DESC
                 LIMIT ?2",
                vec![
                    Box::new(ts.to_rfc3339()) as Box<dyn rusqlite::types::ToSql>,
                    Box::new(limit_i64),
                ],
            ),
            None => (
                "SELECT id, timestamp, operation, credential_id, provider, environment, actor, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
                vec![Box::new(limit_i64) as Box<dyn rusqlite::types::ToSql>],
            ),
        };

        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| VaultError::AuditError(format!("query prepare: {e}")))?;

        let params_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| &**p).collect();

        let rows = stmt
            .query_map(params_refs.as_slice(), |row| {
                let ts_str: String = row.get(1)?;
                let timestamp = DateTime::parse_from_rfc3339(&ts_str)
                    .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

                Ok(AuditEntry {
                    id: row.get(0)?,
                    timestamp,
                    operation: row.get(2)?,
                    credential_id: row.get(3)?,
                    provider: row.get(4)?,
                    environment: row.get(5)?,
                    actor: row.get(6)?,
                    details: row.get(7)?,
                })
            })
            .map_err(|e| VaultError::AuditError(format!("query exec: {e}")))?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row.map_err(|e| VaultError::AuditError(format!("row parse: {e}")))?);
        }

        Ok(entries)
    }
}

/// Convenience helper: log an audit event using the CLI context.
///
/// Opens the audit database, logs the event, and silently ignores any errors.
/// This is safe to call from any command — it never fails the parent operation.
pub fn log_audit(cli: &Cli, event: AuditEvent<'_>) {
    let path = match crate::cli::audit_path() {
        Ok(p) => p,
        Err(_) => return,
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    if let Some(audit) = AuditLog::open(&path) {
        let actor = event.actor.or(cli.actor.as_deref());
        audit.log(&event.actor(actor));
    }
}
