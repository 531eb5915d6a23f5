//! Script execution.

use crate::error::{MigrateError, MigrateResult};
use crate::plan::PendingScript;
use std::sync::Arc;
use strata_db::{Database, DatabaseCore};

/// Reads upgrade scripts from disk and submits them to the database.
#[derive(Clone)]
pub struct ScriptExecutor {
    db: Arc<dyn Database>,
}

impl ScriptExecutor {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Read the script at `pending.path` as UTF-8.
    pub async fn load(&self, module: &str, pending: &PendingScript) -> MigrateResult<String> {
        tokio::fs::read_to_string(&pending.path)
            .await
            .map_err(|source| MigrateError::ScriptLoad {
                module: module.to_string(),
                path: pending.path.display().to_string(),
                source,
            })
    }

    /// Load `pending` and run it as one statement batch.
    pub async fn run(&self, module: &str, pending: &PendingScript) -> MigrateResult<()> {
        let sql = self.load(module, pending).await?;
        self.db
            .execute_batch(&sql)
            .await
            .map_err(|source| MigrateError::ScriptExecution {
                module: module.to_string(),
                script: pending.script.clone(),
                version: pending.parameters,
                source,
            })
    }
}
