//! Database trait definitions
//!
//! The migration engine needs two things from a database: run opaque
//! statement batches ([`DatabaseCore`]) and persist the execution ledger
//! ([`DatabaseLedger`]). [`Database`] is the union of both and is what the
//! engine holds as `Arc<dyn Database>`.

use crate::error::DbResult;
use async_trait::async_trait;
use strata_core::LedgerEntry;

/// Statement execution and catalog checks.
#[async_trait]
pub trait DatabaseCore: Send + Sync {
    /// Execute one or more SQL statements as a single batch
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier; doubles as the default dialect name
    fn db_type(&self) -> &'static str;
}

/// Storage for the append-only execution ledger.
///
/// `table` is a plain or schema-qualified identifier, already validated by
/// the caller.
#[async_trait]
pub trait DatabaseLedger: Send + Sync {
    /// Create the ledger table if it does not exist. Never drops or alters.
    async fn ensure_ledger_table(&self, table: &str) -> DbResult<()>;

    /// Append one ledger row
    async fn insert_ledger_entry(&self, table: &str, entry: &LedgerEntry) -> DbResult<()>;

    /// Latest applied entry for `module`, by (major, minor, patch) descending
    async fn latest_ledger_entry(&self, table: &str, module: &str)
        -> DbResult<Option<LedgerEntry>>;

    /// All entries in insertion order, optionally filtered by module
    async fn ledger_entries(&self, table: &str, module: Option<&str>)
        -> DbResult<Vec<LedgerEntry>>;
}

/// Full database abstraction used by the migration engine.
pub trait Database: DatabaseCore + DatabaseLedger {}

impl<T: DatabaseCore + DatabaseLedger> Database for T {}
