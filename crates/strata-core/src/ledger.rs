//! Execution ledger records.

use crate::module_name::ModuleName;
use crate::version::VersionParameters;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully executed upgrade script.
///
/// A version bundling several scripts produces one entry per script, all
/// tagged with that version's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub module: ModuleName,
    pub applied_at: DateTime<Utc>,
    pub script_name: String,
    pub version: VersionParameters,
}

impl LedgerEntry {
    /// Entry for `script_name` applied now.
    pub fn now(
        module: ModuleName,
        script_name: impl Into<String>,
        version: VersionParameters,
    ) -> Self {
        Self {
            module,
            applied_at: Utc::now(),
            script_name: script_name.into(),
            version,
        }
    }
}
