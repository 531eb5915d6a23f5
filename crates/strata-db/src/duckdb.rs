//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::ledger_sql::{entries_sql, format_timestamp, latest_entry_sql, RawLedgerRow};
use crate::traits::{DatabaseCore, DatabaseLedger};
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use strata_core::sql_utils::{quote_ident, quote_qualified, split_schema};
use strata_core::LedgerEntry;

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        self.lock()?
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = split_schema(name);
        let count: i64 = self.lock()?.query_row(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema.unwrap_or("main"), table],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn ensure_ledger_table_sync(&self, table: &str) -> DbResult<()> {
        let (schema, _) = split_schema(table);
        let sequence = format!("{table}_id_seq");

        let mut ddl = String::new();
        if let Some(schema) = schema {
            ddl.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {};\n", quote_ident(schema)));
        }
        ddl.push_str(&format!(
            "CREATE SEQUENCE IF NOT EXISTS {seq};
             CREATE TABLE IF NOT EXISTS {table} (
                 execution_id BIGINT PRIMARY KEY DEFAULT nextval('{seq_literal}'),
                 module       VARCHAR   NOT NULL,
                 execution_ts TIMESTAMP NOT NULL,
                 script_name  VARCHAR   NOT NULL,
                 major        BIGINT    NOT NULL,
                 minor        BIGINT    NOT NULL,
                 patch        BIGINT    NOT NULL
             );",
            seq = quote_qualified(&sequence),
            seq_literal = sequence.replace('\'', "''"),
            table = quote_qualified(table),
        ));

        self.lock()?.execute_batch(&ddl)?;
        Ok(())
    }

    fn insert_ledger_entry_sync(&self, table: &str, entry: &LedgerEntry) -> DbResult<()> {
        let sql = format!(
            "INSERT INTO {} (module, execution_ts, script_name, major, minor, patch) \
             VALUES (?, CAST(? AS TIMESTAMP), ?, ?, ?, ?)",
            quote_qualified(table)
        );
        self.lock()?.execute(
            &sql,
            duckdb::params![
                entry.module.as_str(),
                format_timestamp(&entry.applied_at),
                entry.script_name,
                i64::from(entry.version.major),
                i64::from(entry.version.minor),
                i64::from(entry.version.patch),
            ],
        )?;
        Ok(())
    }

    fn latest_ledger_entry_sync(
        &self,
        table: &str,
        module: &str,
    ) -> DbResult<Option<LedgerEntry>> {
        let result =
            self.lock()?
                .query_row(&latest_entry_sql(table), duckdb::params![module], raw_row);
        match result {
            Ok(raw) => raw.into_entry(table).map(Some),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn ledger_entries_sync(
        &self,
        table: &str,
        module: Option<&str>,
    ) -> DbResult<Vec<LedgerEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&entries_sql(table, module.is_some()))?;
        let rows = match module {
            Some(module) => stmt
                .query_map(duckdb::params![module], raw_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt.query_map([], raw_row)?.collect::<Result<Vec<_>, _>>()?,
        };
        rows.into_iter().map(|r| r.into_entry(table)).collect()
    }
}

fn raw_row(row: &duckdb::Row<'_>) -> duckdb::Result<RawLedgerRow> {
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
impl DatabaseCore for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl DatabaseLedger for DuckDbBackend {
    async fn ensure_ledger_table(&self, table: &str) -> DbResult<()> {
        self.ensure_ledger_table_sync(table)
    }

    async fn insert_ledger_entry(&self, table: &str, entry: &LedgerEntry) -> DbResult<()> {
        self.insert_ledger_entry_sync(table, entry)
    }

    async fn latest_ledger_entry(
        &self,
        table: &str,
        module: &str,
    ) -> DbResult<Option<LedgerEntry>> {
        self.latest_ledger_entry_sync(table, module)
    }

    async fn ledger_entries(
        &self,
        table: &str,
        module: Option<&str>,
    ) -> DbResult<Vec<LedgerEntry>> {
        self.ledger_entries_sync(table, module)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
