//! SQLite database backend using `rusqlite`.
//!
//! rusqlite is synchronous, so every call runs on the blocking pool via
//! `tokio::task::spawn_blocking` while holding an async mutex.

use crate::error::{DbError, DbResult};
use crate::ledger_sql::{entries_sql, format_timestamp, latest_entry_sql, RawLedgerRow};
use crate::traits::{DatabaseCore, DatabaseLedger};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Arc;
use strata_core::sql_utils::{quote_ident, quote_qualified, split_schema};
use strata_core::LedgerEntry;
use tokio::sync::Mutex;

/// SQLite database backend
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBackend {
    /// Open an in-memory database
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::wrap(conn))
    }

    /// Open (or create) a database file
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self::wrap(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> DbResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> DbResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            f(&conn)
        })
        .await
        .map_err(|e| DbError::Internal(format!("Task join error: {e}")))?
    }
}

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawLedgerRow> {
    Ok(RawLedgerRow {
        module: row.get(0)?,
        execution_ts: row.get(1)?,
        script_name: row.get(2)?,
        major: row.get(3)?,
        minor: row.get(4)?,
        patch: row.get(5)?,
    })
}

#[async_trait]
impl DatabaseCore for SqliteBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        let sql = sql.to_string();
        self.with_conn(move |conn| {
            conn.execute_batch(&sql)
                .map_err(|e| DbError::ExecutionError(e.to_string()))
        })
        .await
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = split_schema(name);
        let sql = format!(
            "SELECT COUNT(*) FROM {}.sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            quote_ident(schema.unwrap_or("main"))
        );
        let table = table.to_string();
        self.with_conn(move |conn| {
            let count: i64 = conn.query_row(&sql, rusqlite::params![table], |row| row.get(0))?;
            Ok(count > 0)
        })
        .await
    }

    fn db_type(&self) -> &'static str {
        "sqlite"
    }
}

#[async_trait]
impl DatabaseLedger for SqliteBackend {
    async fn ensure_ledger_table(&self, table: &str) -> DbResult<()> {
        if let (Some(schema), _) = split_schema(table) {
            if !schema.eq_ignore_ascii_case("main") {
                return Err(DbError::ExecutionError(format!(
                    "ledger table '{table}' names schema '{schema}'; sqlite ledgers live in 'main'"
                )));
            }
        }
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 execution_id INTEGER PRIMARY KEY AUTOINCREMENT,
                 module       TEXT    NOT NULL,
                 execution_ts TEXT    NOT NULL,
                 script_name  TEXT    NOT NULL,
                 major        INTEGER NOT NULL,
                 minor        INTEGER NOT NULL,
                 patch        INTEGER NOT NULL
             );",
            quote_qualified(table)
        );
        self.with_conn(move |conn| {
            conn.execute_batch(&ddl)?;
            Ok(())
        })
        .await
    }

    async fn insert_ledger_entry(&self, table: &str, entry: &LedgerEntry) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO {} (module, execution_ts, script_name, major, minor, patch) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            quote_qualified(table)
        );
        let entry = entry.clone();
        self.with_conn(move |conn| {
            conn.execute(
                &sql,
                rusqlite::params![
                    entry.module.as_str(),
                    format_timestamp(&entry.applied_at),
                    entry.script_name,
                    i64::from(entry.version.major),
                    i64::from(entry.version.minor),
                    i64::from(entry.version.patch),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn latest_ledger_entry(
        &self,
        table: &str,
        module: &str,
    ) -> DbResult<Option<LedgerEntry>> {
        let sql = latest_entry_sql(table);
        let table = table.to_string();
        let module = module.to_string();
        self.with_conn(move |conn| {
            conn.query_row(&sql, rusqlite::params![module], raw_row)
                .optional()?
                .map(|raw| raw.into_entry(&table))
                .transpose()
        })
        .await
    }

    async fn ledger_entries(
        &self,
        table: &str,
        module: Option<&str>,
    ) -> DbResult<Vec<LedgerEntry>> {
        let sql = entries_sql(table, module.is_some());
        let table = table.to_string();
        let module = module.map(str::to_string);
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = match module {
                Some(module) => stmt
                    .query_map(rusqlite::params![module], raw_row)?
                    .collect::<Result<Vec<_>, _>>()?,
                None => stmt.query_map([], raw_row)?.collect::<Result<Vec<_>, _>>()?,
            };
            rows.into_iter().map(|r| r.into_entry(&table)).collect()
        })
        .await
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;
