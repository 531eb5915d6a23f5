//! Error types for strata-migrate

use strata_core::{CoreError, VersionParameters};
use strata_db::DbError;
use thiserror::Error;

/// Errors raised while planning or applying module upgrades.
///
/// Every variant aborts the running sync. Ledger rows written before the
/// failure are kept, so the next sync resumes after them.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// S001: Module cannot be synced with the selected dialect
    #[error("[S001] Configuration error: {0}")]
    Configuration(#[source] CoreError),

    /// S002: Upgrade script could not be read
    #[error("[S002] Failed to load script '{path}' for module '{module}': {source}")]
    ScriptLoad {
        module: String,
        path: String,
        source: std::io::Error,
    },

    /// S003: Database rejected an upgrade script; no ledger row was written
    #[error("[S003] Script '{script}' of module '{module}' (version {version}) failed: {source}")]
    ScriptExecution {
        module: String,
        script: String,
        version: VersionParameters,
        source: DbError,
    },

    /// S004: Script ran but its ledger row could not be written
    #[error("[S004] Script '{script}' of module '{module}' ran but was not recorded: {source}")]
    LedgerWrite {
        module: String,
        script: String,
        source: DbError,
    },

    /// S005: Ledger table could not be created or queried
    #[error("[S005] Failed to read execution ledger '{table}': {source}")]
    LedgerRead { table: String, source: DbError },

    /// S006: Any other core error (invalid version, bad descriptor, ...)
    #[error("[S006] {0}")]
    Core(#[source] CoreError),
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;

impl From<CoreError> for MigrateError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DialectNotFound { .. } => MigrateError::Configuration(err),
            other => MigrateError::Core(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_not_found_is_configuration() {
        let err: MigrateError = CoreError::DialectNotFound {
            module: "core".to_string(),
            dialect: "oracle".to_string(),
        }
        .into();
        assert!(matches!(err, MigrateError::Configuration(_)));
        assert_eq!(
            err.to_string(),
            "[S001] Configuration error: [E005] Dialect 'oracle' not found on 'core'"
        );
    }

    #[test]
    fn test_other_core_errors_pass_through() {
        let err: MigrateError = CoreError::ModuleNotFound {
            name: "core".to_string(),
        }
        .into();
        assert!(matches!(err, MigrateError::Core(_)));
        assert!(err.to_string().starts_with("[S006] [E006]"));
    }
}
