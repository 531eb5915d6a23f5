//! strata-db - Database abstraction layer for Strata
//!
//! This crate provides the `Database` trait the migration engine runs
//! against, with a DuckDB backend and an optional SQLite backend
//! (`sqlite` feature).

pub mod duckdb;
pub mod error;
pub(crate) mod ledger_sql;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;
pub use traits::{Database, DatabaseCore, DatabaseLedger};
