//! Upgrade planning.
//!
//! A [`ModulePlan`] is the ordered list of scripts a sync would run for one
//! module, computed from the module's version chain, its target version and
//! the latest ledger entry. Planning never touches the database; the engine
//! feeds it the ledger lookup and then drains the plan one script at a time.

use std::cmp::Ordering;
use std::path::PathBuf;
use strata_core::{
    compare_versions, CoreResult, LedgerEntry, ModuleDescriptor, ModuleName, VersionParameters,
};

/// One script waiting to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingScript {
    /// Declared version string of the owning node
    pub version: String,
    /// Parameters recorded in the ledger for this script
    pub parameters: VersionParameters,
    /// Script file name as declared
    pub script: String,
    /// Resolved `<dir>/<dialect>/<script>` path
    pub path: PathBuf,
}

/// Scripts pending for one module, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePlan {
    pub module: ModuleName,
    pub dialect: String,
    pub target: VersionParameters,
    /// Version of the latest ledger entry the plan starts after
    pub applied: Option<VersionParameters>,
    pub scripts: Vec<PendingScript>,
}

impl ModulePlan {
    /// Walk `descriptor`'s `dialect` chain from the node after `latest`
    /// (or from the first node) while the target is not below the node.
    pub fn build(
        descriptor: &ModuleDescriptor,
        dialect: &str,
        latest: Option<&LedgerEntry>,
    ) -> CoreResult<Self> {
        let chain = descriptor.chain(dialect)?;
        let target = descriptor.target();

        let mut current = match latest {
            Some(entry) => descriptor.get_next_version(dialect, &entry.version.to_string())?,
            None => Some(descriptor.get_first_version(dialect)?),
        };

        let mut scripts = Vec::new();
        while let Some(node) = current {
            if compare_versions(&target, &node.parameters()) == Ordering::Less {
                break;
            }
            scripts.extend(node.scripts().iter().map(|script| PendingScript {
                version: node.version().to_string(),
                parameters: node.parameters(),
                script: script.clone(),
                path: descriptor.script_path(dialect, script),
            }));
            current = chain.next(node);
        }

        Ok(Self {
            module: descriptor.name().clone(),
            dialect: dialect.to_string(),
            target,
            applied: latest.map(|entry| entry.version),
            scripts,
        })
    }

    /// Whether the module is already up to date.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
