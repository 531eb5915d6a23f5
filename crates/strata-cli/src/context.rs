//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_core::{Config, DatabaseConfig, DbType};
use strata_db::{Database, DatabaseCore, DuckDbBackend};
use strata_migrate::{ExecutionLedger, MigrationEngine};

use crate::cli::GlobalArgs;

/// Runtime context containing the loaded config and database connection
pub(crate) struct RuntimeContext {
    /// Project configuration
    pub config: Config,

    /// Project directory; module paths resolve against it
    pub root: PathBuf,

    /// Database connection
    pub db: Arc<dyn Database>,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub(crate) fn new(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };

        let db_path = args.database.as_deref().unwrap_or(&config.database.path);
        let db = connect(&config.database, db_path)
            .with_context(|| format!("Failed to connect to database: {db_path}"))?;
        log::debug!("Connected to {} database at {}", db.db_type(), db_path);

        Ok(Self { config, root, db })
    }

    /// Build the migration engine with every configured module registered.
    pub(crate) fn engine(&self) -> Result<MigrationEngine> {
        MigrationEngine::from_config(&self.config, &self.root, Arc::clone(&self.db))
            .context("Failed to load modules")
    }

    /// Open the execution ledger without loading any module descriptors.
    pub(crate) fn ledger(&self) -> Result<ExecutionLedger> {
        ExecutionLedger::new(Arc::clone(&self.db), self.config.ledger_table.as_str())
            .context("Invalid ledger table")
    }
}

fn connect(database: &DatabaseConfig, path: &str) -> Result<Arc<dyn Database>> {
    match database.db_type {
        DbType::DuckDb => Ok(Arc::new(DuckDbBackend::new(path)?)),
        DbType::Sqlite => connect_sqlite(path),
    }
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(path: &str) -> Result<Arc<dyn Database>> {
    Ok(Arc::new(strata_db::SqliteBackend::new(path)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_path: &str) -> Result<Arc<dyn Database>> {
    anyhow::bail!("SQLite support is not compiled in; rebuild with the `sqlite` feature")
}
