//! Module descriptor input format.
//!
//! A descriptor declares one module: its name, the version the deployment
//! should be brought up to, where its scripts live, and per dialect the
//! ordered list of versions with their upgrade scripts.
//!
//! ```json
//! {
//!   "module": "billing",
//!   "dir": "scripts",
//!   "version": "1.1.0",
//!   "dialects": {
//!     "duckdb": [
//!       { "version": "1.0.0", "upgrade": ["upgrade_1_0_0.sql"] },
//!       { "version": "1.1.0", "upgrade": ["upgrade_1_1_0.sql"] }
//!     ]
//!   }
//! }
//! ```

use crate::error::{CoreError, CoreResult};
use crate::module_name::ModuleName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Declarative description of a module, as read from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleSpec {
    /// Module name; keys the execution ledger
    pub module: ModuleName,

    /// Root directory holding one sub-directory of scripts per dialect
    #[serde(default)]
    pub dir: PathBuf,

    /// Target version the module should be synced up to
    pub version: String,

    /// Version lists keyed by dialect name
    #[serde(default)]
    pub dialects: BTreeMap<String, Vec<VersionSpec>>,
}

/// One declared version and the scripts that upgrade to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionSpec {
    /// Version string, e.g. `"1.0.1"`
    pub version: String,

    /// Script file names, executed in this order
    #[serde(default)]
    pub upgrade: Vec<String>,
}

impl VersionSpec {
    /// Convenience constructor used by tests and `strata init`.
    pub fn new<I, S>(version: impl Into<String>, upgrade: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            version: version.into(),
            upgrade: upgrade.into_iter().map(Into::into).collect(),
        }
    }
}

impl ModuleSpec {
    /// Load a descriptor from a `.json`, `.yml` or `.yaml` file.
    ///
    /// A relative `dir` is resolved against the descriptor's own directory.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let parse_error = |message: String| CoreError::DescriptorParseError {
            path: path.display().to_string(),
            message,
        };

        let mut spec: ModuleSpec = match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            _ => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        };

        if spec.dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            spec.dir = base.join(&spec.dir);
        }
        log::debug!(
            "Loaded descriptor for module '{}' from {}",
            spec.module,
            path.display()
        );
        Ok(spec)
    }
}

#[cfg(test)]
#[path = "descriptor_test.rs"]
mod tests;
