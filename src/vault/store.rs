//! Credential persistence.
//!
//! `CredentialStore` is the seam between the vault's rules and the
//! database.  Every method is a single indivisible operation: the
//! activation check and the write it guards happen inside one
//! transaction, and usage accounting is one `UPDATE … RETURNING`.
//!
//! `SqliteStore` backs it with SQLite.  Writes run in `BEGIN IMMEDIATE`
//! transactions so concurrent writers (other threads or other processes
//! on the same file) serialize, and a partial unique index over
//! `(provider, environment) WHERE is_active = 1` makes a second active
//! record for a pair impossible even if the check were bypassed.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::{debug, warn};

use super::query::{ListFilter, Pagination, Stats};
use super::record::{CredentialRecord, Provider};
use crate::errors::{Result, VaultError};

/// How long a writer waits for another writer's transaction.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Schema, applied idempotently on open.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS credentials (
    id               TEXT PRIMARY KEY,
    name             TEXT NOT NULL,
    provider         TEXT NOT NULL,
    environment      TEXT NOT NULL,
    encrypted_secret TEXT NOT NULL,
    description      TEXT,
    is_active        INTEGER NOT NULL CHECK (is_active IN (0, 1)),
    usage_count      INTEGER NOT NULL DEFAULT 0 CHECK (usage_count >= 0),
    last_used_at     TEXT,
    created_by       TEXT,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS credentials_one_active_per_pair
    ON credentials (provider, environment) WHERE is_active = 1;
CREATE INDEX IF NOT EXISTS credentials_by_pair
    ON credentials (provider, environment);
CREATE INDEX IF NOT EXISTS credentials_by_created
    ON credentials (created_at DESC, id);
";

const COLUMNS: &str = "id, name, provider, environment, encrypted_secret, description, \
     is_active, usage_count, last_used_at, created_by, created_at, updated_at";

/// Persistence operations the vault relies on.
pub trait CredentialStore {
    /// Insert a new record.  If it is active and another active record
    /// holds the same pair, nothing is written and `Conflict` is returned.
    fn insert(&self, record: &CredentialRecord) -> Result<()>;

    /// Fetch one record by id.
    fn get(&self, id: &str) -> Result<Option<CredentialRecord>>;

    /// Read-modify-write one record atomically.
    ///
    /// `apply` mutates the current record; if the result is active, the
    /// pair check runs before anything is written.  Returns the record as
    /// written.  `NotFound` if the id is unknown.
    fn modify(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut CredentialRecord) -> Result<()>,
    ) -> Result<CredentialRecord>;

    /// Delete a record.  Returns `false` if the id was unknown.
    fn delete(&self, id: &str) -> Result<bool>;

    /// One page of matching records, newest first, plus the total match count.
    fn list(
        &self,
        filter: &ListFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<CredentialRecord>, u64)>;

    /// Aggregate counts.  `recent_since` bounds the "recently used" window.
    fn stats(&self, recent_since: DateTime<Utc>) -> Result<Stats>;

    /// Count one use of the active record for the pair.
    ///
    /// Increments `usage_count` and sets `last_used_at = at` on the active
    /// record, then hands the updated record to `accept`.  The increment is
    /// kept only if `accept` succeeds.  Returns `None` if the pair has no
    /// active record.
    fn record_use(
        &self,
        provider: Provider,
        environment: &str,
        at: DateTime<Utc>,
        accept: &mut dyn FnMut(&CredentialRecord) -> Result<()>,
    ) -> Result<Option<CredentialRecord>>;
}

impl<S: CredentialStore + ?Sized> CredentialStore for Arc<S> {
    fn insert(&self, record: &CredentialRecord) -> Result<()> {
        (**self).insert(record)
    }

    fn get(&self, id: &str) -> Result<Option<CredentialRecord>> {
        (**self).get(id)
    }

    fn modify(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut CredentialRecord) -> Result<()>,
    ) -> Result<CredentialRecord> {
        (**self).modify(id, apply)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        (**self).delete(id)
    }

    fn list(
        &self,
        filter: &ListFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<CredentialRecord>, u64)> {
        (**self).list(filter, pagination)
    }

    fn stats(&self, recent_since: DateTime<Utc>) -> Result<Stats> {
        (**self).stats(recent_since)
    }

    fn record_use(
        &self,
        provider: Provider,
        environment: &str,
        at: DateTime<Utc>,
        accept: &mut dyn FnMut(&CredentialRecord) -> Result<()>,
    ) -> Result<Option<CredentialRecord>> {
        (**self).record_use(provider, environment, at, accept)
    }
}

/// SQLite-backed credential store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the credential database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Restrict the database to the owner; it holds ciphertext.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;

        Self::from_connection(conn)
    }

    /// A private in-memory database, for tests and throwaway use.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        register_fold(&conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| VaultError::Storage("connection mutex poisoned".into()))
    }
}

impl CredentialStore for SqliteStore {
    fn insert(&self, record: &CredentialRecord) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if record.is_active {
            ensure_pair_free(&tx, record)?;
        }

        tx.execute(
            &format!(
                "INSERT INTO credentials ({COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
            ),
            params![
                record.id,
                record.name,
                record.provider.as_str(),
                record.environment,
                record.encrypted_secret,
                record.description,
                record.is_active,
                to_i64(record.usage_count)?,
                record.last_used_at.as_ref().map(format_timestamp),
                record.created_by,
                format_timestamp(&record.created_at),
                format_timestamp(&record.updated_at),
            ],
        )
        .map_err(|e| write_error(&tx, e, record))?;

        tx.commit()?;
        debug!(id = %record.id, "credential row inserted");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<CredentialRecord>> {
        let conn = self.lock()?;
        fetch(&conn, id)
    }

    fn modify(
        &self,
        id: &str,
        apply: &mut dyn FnMut(&mut CredentialRecord) -> Result<()>,
    ) -> Result<CredentialRecord> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut record = fetch(&tx, id)?.ok_or_else(|| VaultError::NotFound(id.to_string()))?;
        apply(&mut record)?;
        record.id = id.to_string();

        if record.is_active {
            ensure_pair_free(&tx, &record)?;
        }

        tx.execute(
            "UPDATE credentials
             SET name = ?2, provider = ?3, environment = ?4, encrypted_secret = ?5,
                 description = ?6, is_active = ?7, updated_at = ?8
             WHERE id = ?1",
            params![
                record.id,
                record.name,
                record.provider.as_str(),
                record.environment,
                record.encrypted_secret,
                record.description,
                record.is_active,
                format_timestamp(&record.updated_at),
            ],
        )
        .map_err(|e| write_error(&tx, e, &record))?;

        tx.commit()?;
        Ok(record)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM credentials WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn list(
        &self,
        filter: &ListFilter,
        pagination: &Pagination,
    ) -> Result<(Vec<CredentialRecord>, u64)> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(provider) = filter.provider {
            values.push(Box::new(provider.as_str()));
            clauses.push(format!("provider = ?{}", values.len()));
        }
        if let Some(is_active) = filter.is_active {
            values.push(Box::new(is_active));
            clauses.push(format!("is_active = ?{}", values.len()));
        }
        if let Some(ref environment) = filter.environment {
            values.push(Box::new(environment.clone()));
            clauses.push(format!("environment = ?{}", values.len()));
        }
        if let Some(term) = filter.search_term() {
            values.push(Box::new(like_pattern(term)));
            let n = values.len();
            clauses.push(format!(
                "({FOLD_FN}(name) LIKE ?{n} ESCAPE '\\' \
                 OR {FOLD_FN}(COALESCE(description, '')) LIKE ?{n} ESCAPE '\\')"
            ));
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let mut conn = self.lock()?;
        // One read transaction so the count and the page see the same snapshot.
        let tx = conn.transaction()?;

        let filter_refs: Vec<&dyn ToSql> = values.iter().map(|v| &**v).collect();
        let total: i64 = tx.query_row(
            &format!("SELECT COUNT(*) FROM credentials {where_sql}"),
            filter_refs.as_slice(),
            |row| row.get(0),
        )?;

        let limit = i64::from(pagination.limit);
        let offset = to_i64(pagination.offset())?;
        let page_sql = format!(
            "SELECT {COLUMNS} FROM credentials {where_sql}
             ORDER BY created_at DESC, id ASC
             LIMIT ?{} OFFSET ?{}",
            values.len() + 1,
            values.len() + 2
        );
        let mut page_refs = filter_refs;
        page_refs.push(&limit);
        page_refs.push(&offset);

        let records = {
            let mut stmt = tx.prepare(&page_sql)?;
            let rows = stmt.query_map(page_refs.as_slice(), row_to_record)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;

        Ok((records, u64::try_from(total).unwrap_or(0)))
    }

    fn stats(&self, recent_since: DateTime<Utc>) -> Result<Stats> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let count = |sql: &str, args: &[&dyn ToSql]| -> Result<u64> {
            let n: i64 = tx.query_row(sql, args, |row| row.get(0))?;
            Ok(u64::try_from(n).unwrap_or(0))
        };

        let total = count("SELECT COUNT(*) FROM credentials", &[])?;
        let active = count("SELECT COUNT(*) FROM credentials WHERE is_active = 1", &[])?;
        let since = format_timestamp(&recent_since);
        let recently_used = count(
            "SELECT COUNT(*) FROM credentials
             WHERE last_used_at IS NOT NULL AND last_used_at >= ?1",
            &[&since],
        )?;

        let mut stats = Stats {
            total,
            active,
            recently_used,
            ..Stats::default()
        };

        {
            let mut stmt =
                tx.prepare("SELECT provider, COUNT(*) FROM credentials GROUP BY provider")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (tag, n) = row?;
                match tag.parse::<Provider>() {
                    Ok(provider) => {
                        stats
                            .by_provider
                            .insert(provider, u64::try_from(n).unwrap_or(0));
                    }
                    Err(_) => warn!(provider = %tag, "skipping unknown provider in stats"),
                }
            }
        }
        tx.commit()?;

        Ok(stats)
    }

    fn record_use(
        &self,
        provider: Provider,
        environment: &str,
        at: DateTime<Utc>,
        accept: &mut dyn FnMut(&CredentialRecord) -> Result<()>,
    ) -> Result<Option<CredentialRecord>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let record = tx
            .query_row(
                &format!(
                    "UPDATE credentials
                     SET usage_count = usage_count + 1, last_used_at = ?3
                     WHERE provider = ?1 AND environment = ?2 AND is_active = 1
                     RETURNING {COLUMNS}"
                ),
                params![provider.as_str(), environment, format_timestamp(&at)],
                row_to_record,
            )
            .optional()?;

        match record {
            Some(record) => {
                // Dropping `tx` on error rolls the increment back.
                accept(&record)?;
                tx.commit()?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn fetch(conn: &Connection, id: &str) -> Result<Option<CredentialRecord>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM credentials WHERE id = ?1"),
        params![id],
        row_to_record,
    )
    .optional()
    .map_err(Into::into)
}

/// Id of the active record holding the pair, other than `exclude_id`.
fn active_holder(
    conn: &Connection,
    provider: Provider,
    environment: &str,
    exclude_id: &str,
) -> Result<Option<String>> {
    conn.query_row(
        "SELECT id FROM credentials
         WHERE provider = ?1 AND environment = ?2 AND is_active = 1 AND id <> ?3",
        params![provider.as_str(), environment, exclude_id],
        |row| row.get(0),
    )
    .optional()
    .map_err(Into::into)
}

fn ensure_pair_free(conn: &Connection, record: &CredentialRecord) -> Result<()> {
    match active_holder(conn, record.provider, &record.environment, &record.id)? {
        Some(existing_id) => Err(conflict(record, existing_id)),
        None => Ok(()),
    }
}

fn conflict(record: &CredentialRecord, existing_id: String) -> VaultError {
    VaultError::Conflict {
        provider: record.provider.to_string(),
        environment: record.environment.clone(),
        existing_id,
    }
}

/// Map a failed write, turning the active-pair index violation into `Conflict`.
fn write_error(conn: &Connection, e: rusqlite::Error, record: &CredentialRecord) -> VaultError {
    let unique_violation = matches!(
        &e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    );
    if !unique_violation {
        return e.into();
    }

    let existing_id = active_holder(conn, record.provider, &record.environment, &record.id)
        .ok()
        .flatten()
        .unwrap_or_default();
    conflict(record, existing_id)
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CredentialRecord> {
    let provider: String = row.get(2)?;
    let usage_count: i64 = row.get(7)?;
    let last_used_at: Option<String> = row.get(8)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(CredentialRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        provider: provider.parse().map_err(|e| conversion_error(2, e))?,
        environment: row.get(3)?,
        encrypted_secret: row.get(4)?,
        description: row.get(5)?,
        is_active: row.get(6)?,
        usage_count: u64::try_from(usage_count).map_err(|e| conversion_error(7, e))?,
        last_used_at: last_used_at
            .as_deref()
            .map(parse_timestamp)
            .transpose()
            .map_err(|e| conversion_error(8, e))?,
        created_by: row.get(9)?,
        created_at: parse_timestamp(&created_at).map_err(|e| conversion_error(10, e))?,
        updated_at: parse_timestamp(&updated_at).map_err(|e| conversion_error(11, e))?,
    })
}

fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Fixed-width UTC timestamps, so text comparison is time comparison.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

fn to_i64(n: u64) -> Result<i64> {
    i64::try_from(n).map_err(|_| VaultError::Storage(format!("value {n} out of range")))
}

/// SQL name of the Unicode lowercasing function used by search.
const FOLD_FN: &str = "credvault_fold";

/// Register `credvault_fold(text)`, Rust's Unicode `to_lowercase` as a SQL
/// function.  SQLite's own `LOWER` only folds ASCII, so the column side
/// and the search term must both go through the same folding.
fn register_fold(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        FOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )?;
    Ok(())
}

/// Lowercased `%term%` with LIKE wildcards escaped.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::record::now as timestamp_now;
    use chrono::Duration as ChronoDuration;

    fn record(id: &str, provider: Provider, env: &str, active: bool) -> CredentialRecord {
        let now = timestamp_now();
        CredentialRecord {
            id: id.into(),
            name: format!("key {id}"),
            provider,
            environment: env.into(),
            encrypted_secret: "v1:opaque".into(),
            description: None,
            is_active: active,
            usage_count: 0,
            last_used_at: None,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let rec = record("a", Provider::Stripe, "production", true);
        store.insert(&rec).unwrap();

        let loaded = store.get("a").unwrap().unwrap();
        assert_eq!(loaded.provider, Provider::Stripe);
        assert_eq!(loaded.encrypted_secret, "v1:opaque");
        assert_eq!(loaded.created_at, rec.created_at);
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn second_active_insert_for_pair_conflicts() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&record("a", Provider::Stripe, "production", true))
            .unwrap();

        let err = store
            .insert(&record("b", Provider::Stripe, "production", true))
            .unwrap_err();
        match err {
            VaultError::Conflict { existing_id, .. } => assert_eq!(existing_id, "a"),
            other => panic!("expected Conflict, got {other:?}"),
        }
        assert!(store.get("b").unwrap().is_none());

        // Inactive records and other environments are unaffected.
        store
            .insert(&record("c", Provider::Stripe, "production", false))
            .unwrap();
        store
            .insert(&record("d", Provider::Stripe, "staging", true))
            .unwrap();
    }

    #[test]
    fn modify_guards_activation() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&record("a", Provider::Aws, "production", true))
            .unwrap();
        store
            .insert(&record("b", Provider::Aws, "production", false))
            .unwrap();

        let err = store
            .modify("b", &mut |r| {
                r.is_active = true;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, VaultError::Conflict { .. }));
        assert!(!store.get("b").unwrap().unwrap().is_active);
    }

    #[test]
    fn modify_unknown_id_is_not_found() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store.modify("nope", &mut |_| Ok(())).unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[test]
    fn record_use_rolls_back_when_rejected() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&record("a", Provider::Slack, "production", true))
            .unwrap();

        let err = store
            .record_use(Provider::Slack, "production", Utc::now(), &mut |_| {
                Err(VaultError::DecryptionFailed)
            })
            .unwrap_err();
        assert!(matches!(err, VaultError::DecryptionFailed));

        let loaded = store.get("a").unwrap().unwrap();
        assert_eq!(loaded.usage_count, 0);
        assert!(loaded.last_used_at.is_none());
    }

    #[test]
    fn record_use_ignores_inactive_records() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&record("a", Provider::Slack, "production", false))
            .unwrap();
        let used = store
            .record_use(Provider::Slack, "production", Utc::now(), &mut |_| Ok(()))
            .unwrap();
        assert!(used.is_none());
    }

    #[test]
    fn stats_window_uses_last_used_at() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .insert(&record("a", Provider::GitHub, "production", true))
            .unwrap();
        store
            .insert(&record("b", Provider::GitHub, "staging", true))
            .unwrap();
        store
            .insert(&record("c", Provider::Twilio, "production", false))
            .unwrap();

        let long_ago = timestamp_now() - ChronoDuration::days(45);
        store
            .record_use(Provider::GitHub, "production", timestamp_now(), &mut |_| Ok(()))
            .unwrap();
        store
            .record_use(Provider::GitHub, "staging", long_ago, &mut |_| Ok(()))
            .unwrap();

        let stats = store
            .stats(Utc::now() - ChronoDuration::days(30))
            .unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.recently_used, 1);
        assert_eq!(stats.by_provider.get(&Provider::GitHub), Some(&2));
        assert_eq!(stats.by_provider.get(&Provider::Twilio), Some(&1));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Key"), "%key%");
        assert_eq!(like_pattern("100%_x"), "%100\\%\\_x%");
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut a = record("a", Provider::OpenAi, "production", false);
        a.name = "rate_limited".into();
        let mut b = record("b", Provider::OpenAi, "production", false);
        b.name = "ratelimited".into();
        store.insert(&a).unwrap();
        store.insert(&b).unwrap();

        let (items, total) = store
            .list(&ListFilter::default().search("_"), &Pagination::default())
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].id, "a");
    }

    #[test]
    fn timestamps_sort_lexically_and_roundtrip() {
        let early = timestamp_now();
        let late = early + ChronoDuration::milliseconds(1);
        assert!(format_timestamp(&early) < format_timestamp(&late));
        assert_eq!(parse_timestamp(&format_timestamp(&early)).unwrap(), early);
    }
}
