//! The migration engine.
//!
//! [`MigrationEngine::sync`] brings every registered module up to its target
//! version: it makes sure the ledger table exists, then for each module in
//! registration order builds a [`ModulePlan`] from the latest ledger entry and
//! drains it one script at a time. A script's ledger row is written before
//! the next script starts, so a failed sync can simply be re-run.
//!
//! Two processes syncing the same database at once are not coordinated.

use crate::error::MigrateResult;
use crate::executor::ScriptExecutor;
use crate::ledger::ExecutionLedger;
use crate::plan::ModulePlan;
use std::path::Path;
use std::sync::Arc;
use strata_core::{Config, LedgerEntry, ModuleDescriptor, ModuleName, ModuleRegistry};
use strata_db::{Database, DatabaseCore};

/// Scripts applied for one module during a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleReport {
    pub module: ModuleName,
    pub applied: Vec<LedgerEntry>,
}

/// Outcome of a successful [`MigrationEngine::sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One report per registered module, in sync order
    pub modules: Vec<ModuleReport>,
}

impl SyncReport {
    /// Total number of scripts applied across modules.
    pub fn total_applied(&self) -> usize {
        self.modules.iter().map(|m| m.applied.len()).sum()
    }

    /// Whether the sync found nothing to do.
    pub fn is_noop(&self) -> bool {
        self.total_applied() == 0
    }
}

/// Applies registered modules' upgrade scripts to one database.
pub struct MigrationEngine {
    registry: ModuleRegistry,
    dialect: String,
    ledger: ExecutionLedger,
    executor: ScriptExecutor,
}

impl MigrationEngine {
    /// Engine over `db` using its `db_type()` as the dialect.
    pub fn new(
        registry: ModuleRegistry,
        db: Arc<dyn Database>,
        ledger_table: &str,
    ) -> MigrateResult<Self> {
        let dialect = db.db_type().to_string();
        Ok(Self {
            registry,
            dialect,
            ledger: ExecutionLedger::new(Arc::clone(&db), ledger_table)?,
            executor: ScriptExecutor::new(db),
        })
    }

    /// Build an engine from a project config, registering every module it
    /// lists (paths relative to `root`).
    pub fn from_config(
        config: &Config,
        root: &Path,
        db: Arc<dyn Database>,
    ) -> MigrateResult<Self> {
        let mut registry = ModuleRegistry::with_link_order(config.link_order);
        for spec in config.load_modules(root)? {
            registry.add_module(spec)?;
        }

        let dialect = config.dialect_or(db.db_type()).to_string();
        Ok(Self::new(registry, db, &config.ledger_table)?.with_dialect(dialect))
    }

    /// Override the dialect used to select chains and script directories.
    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = dialect.into();
        self
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Mutable registry, for registering or re-targeting modules between syncs.
    pub fn registry_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.registry
    }

    pub fn ledger(&self) -> &ExecutionLedger {
        &self.ledger
    }

    /// Sync every registered module, in registration order.
    ///
    /// The first failure aborts the whole sync; modules after it are not
    /// attempted.
    pub async fn sync(&self) -> MigrateResult<SyncReport> {
        self.ledger.ensure().await?;

        let mut report = SyncReport::default();
        for descriptor in self.registry.modules() {
            report.modules.push(self.apply_module(descriptor).await?);
        }

        log::info!(
            "Sync complete: {} script(s) applied across {} module(s)",
            report.total_applied(),
            report.modules.len()
        );
        Ok(report)
    }

    /// Sync a single module.
    pub async fn sync_module(
        &self,
        descriptor: &ModuleDescriptor,
    ) -> MigrateResult<ModuleReport> {
        self.ledger.ensure().await?;
        self.apply_module(descriptor).await
    }

    /// Pending scripts per module, without executing or recording anything.
    ///
    /// A missing ledger table is treated as an empty ledger.
    pub async fn plan(&self) -> MigrateResult<Vec<ModulePlan>> {
        let ledger_exists = self.ledger.exists().await?;

        let mut plans = Vec::with_capacity(self.registry.len());
        for descriptor in self.registry.modules() {
            let latest = if ledger_exists {
                self.ledger.latest_applied(descriptor.name()).await?
            } else {
                None
            };
            plans.push(ModulePlan::build(descriptor, &self.dialect, latest.as_ref())?);
        }
        Ok(plans)
    }

    async fn apply_module(&self, descriptor: &ModuleDescriptor) -> MigrateResult<ModuleReport> {
        let name = descriptor.name();
        let latest = self.ledger.latest_applied(name).await?;
        let plan = ModulePlan::build(descriptor, &self.dialect, latest.as_ref())?;

        if plan.is_empty() {
            log::info!(
                "Module '{}' is up to date (target {}, dialect {})",
                name,
                plan.target,
                self.dialect
            );
        }

        let mut applied = Vec::with_capacity(plan.len());
        for pending in &plan.scripts {
            self.executor.run(name, pending).await?;

            let entry = LedgerEntry::now(name.clone(), &pending.script, pending.parameters);
            self.ledger.record(&entry).await?;
            log::debug!(
                "Applied {} for module '{}' at version {}",
                pending.script,
                name,
                pending.version
            );
            applied.push(entry);
        }

        if !applied.is_empty() {
            log::info!(
                "Module '{}': applied {} script(s) (target {})",
                name,
                applied.len(),
                plan.target
            );
        }

        Ok(ModuleReport {
            module: name.clone(),
            applied,
        })
    }
}

impl std::fmt::Debug for MigrationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationEngine")
            .field("modules", &self.registry.len())
            .field("dialect", &self.dialect)
            .field("ledger", &self.ledger)
            .finish()
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
