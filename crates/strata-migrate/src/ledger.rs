//! Execution ledger access for the engine.

use crate::error::{MigrateError, MigrateResult};
use std::sync::Arc;
use strata_core::sql_utils::is_qualified_identifier;
use strata_core::{CoreError, LedgerEntry};
use strata_db::{Database, DatabaseCore, DatabaseLedger};

/// The ledger table on one database.
///
/// Wraps the raw [`Database`] ledger calls and attaches migrate error
/// context. The table name is validated once here since it is spliced into
/// SQL by the backends.
#[derive(Clone)]
pub struct ExecutionLedger {
    db: Arc<dyn Database>,
    table: String,
}

impl ExecutionLedger {
    pub fn new(db: Arc<dyn Database>, table: impl Into<String>) -> MigrateResult<Self> {
        let table = table.into();
        if !is_qualified_identifier(&table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "ledger table '{table}' must be an identifier, optionally schema-qualified"
                ),
            }
            .into());
        }
        Ok(Self { db, table })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create the ledger table when absent.
    pub async fn ensure(&self) -> MigrateResult<()> {
        self.db
            .ensure_ledger_table(&self.table)
            .await
            .map_err(|source| self.read_error(source))
    }

    /// Whether the ledger table exists yet.
    pub async fn exists(&self) -> MigrateResult<bool> {
        self.db
            .relation_exists(&self.table)
            .await
            .map_err(|source| self.read_error(source))
    }

    /// Highest-versioned entry recorded for `module`.
    pub async fn latest_applied(&self, module: &str) -> MigrateResult<Option<LedgerEntry>> {
        self.db
            .latest_ledger_entry(&self.table, module)
            .await
            .map_err(|source| self.read_error(source))
    }

    /// Append `entry`.
    pub async fn record(&self, entry: &LedgerEntry) -> MigrateResult<()> {
        self.db
            .insert_ledger_entry(&self.table, entry)
            .await
            .map_err(|source| MigrateError::LedgerWrite {
                module: entry.module.to_string(),
                script: entry.script_name.clone(),
                source,
            })
    }

    /// Recorded entries in insertion order, optionally for one module.
    pub async fn history(&self, module: Option<&str>) -> MigrateResult<Vec<LedgerEntry>> {
        self.db
            .ledger_entries(&self.table, module)
            .await
            .map_err(|source| self.read_error(source))
    }

    fn read_error(&self, source: strata_db::DbError) -> MigrateError {
        MigrateError::LedgerRead {
            table: self.table.clone(),
            source,
        }
    }
}

impl std::fmt::Debug for ExecutionLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionLedger")
            .field("db", &self.db.db_type())
            .field("table", &self.table)
            .finish()
    }
}
