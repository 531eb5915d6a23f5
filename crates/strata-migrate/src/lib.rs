//! strata-migrate - Migration engine for Strata
//!
//! Plans and applies each registered module's upgrade scripts against a
//! [`strata_db::Database`], recording every executed script in the
//! execution ledger.

pub mod engine;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod plan;

pub use engine::{MigrationEngine, ModuleReport, SyncReport};
pub use error::{MigrateError, MigrateResult};
pub use executor::ScriptExecutor;
pub use ledger::ExecutionLedger;
pub use plan::{ModulePlan, PendingScript};
