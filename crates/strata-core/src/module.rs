//! Registered module descriptors and version resolution.

use crate::chain::{LinkOrder, VersionChain, VersionLookup, VersionNode};
use crate::descriptor::ModuleSpec;
use crate::error::{CoreError, CoreResult};
use crate::module_name::ModuleName;
use crate::version::{comparison_key, VersionParameters};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A module with its version chains built, ready to be synced.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    name: ModuleName,
    version: String,
    target: VersionParameters,
    dir: PathBuf,
    chains: BTreeMap<String, VersionChain>,
}

impl ModuleDescriptor {
    /// Build chains for every dialect declared in `spec`.
    pub fn from_spec(spec: ModuleSpec, link_order: LinkOrder) -> CoreResult<Self> {
        let target = VersionParameters::parse(&spec.version)?;
        let chains = spec
            .dialects
            .iter()
            .map(|(dialect, entries)| {
                VersionChain::build(&spec.module, dialect, entries, link_order)
                    .map(|chain| (dialect.clone(), chain))
            })
            .collect::<CoreResult<BTreeMap<_, _>>>()?;

        Ok(Self {
            name: spec.module,
            version: spec.version,
            target,
            dir: spec.dir,
            chains,
        })
    }

    /// Module name.
    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    /// Declared target version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Parsed target version.
    pub fn target(&self) -> VersionParameters {
        self.target
    }

    /// Script directory root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Dialect names with a declared chain.
    pub fn dialects(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    /// Re-target the module (e.g. after a deployment bumps its version).
    pub fn set_target_version(&mut self, version: impl Into<String>) -> CoreResult<()> {
        let version = version.into();
        self.target = VersionParameters::parse(&version)?;
        self.version = version;
        Ok(())
    }

    /// The version chain for `dialect`.
    pub fn chain(&self, dialect: &str) -> CoreResult<&VersionChain> {
        self.chains
            .get(dialect)
            .ok_or_else(|| self.dialect_not_found(dialect))
    }

    /// Resolve `version` against the `dialect` chain.
    ///
    /// Any pre-release suffix is stripped first (see
    /// [`comparison_key`]). A non-empty chain always resolves to some node:
    /// when no declared version matches, the final node is returned as
    /// [`VersionLookup::FallenThroughToLast`].
    pub fn get_version(&self, dialect: &str, version: &str) -> CoreResult<VersionLookup<'_>> {
        let chain = self.chain(dialect)?;
        let lookup = chain.lookup(comparison_key(version));
        if let VersionLookup::FallenThroughToLast(node) = lookup {
            log::warn!(
                "Version '{}' not declared for module '{}' ({}); using last version {}",
                version,
                self.name,
                dialect,
                node.version()
            );
        }
        Ok(lookup)
    }

    /// First (lowest) version of the `dialect` chain.
    ///
    /// Fails when the dialect is missing or declares no versions.
    pub fn get_first_version(&self, dialect: &str) -> CoreResult<&VersionNode> {
        self.chain(dialect)?
            .first()
            .ok_or_else(|| self.dialect_not_found(dialect))
    }

    /// The node linked after the one `version` resolves to.
    pub fn get_next_version(
        &self,
        dialect: &str,
        version: &str,
    ) -> CoreResult<Option<&VersionNode>> {
        let chain = self.chain(dialect)?;
        Ok(self
            .get_version(dialect, version)?
            .node()
            .and_then(|node| chain.next(node)))
    }

    /// Path of `script` under this module's `dialect` directory.
    pub fn script_path(&self, dialect: &str, script: &str) -> PathBuf {
        self.dir.join(dialect).join(script)
    }

    fn dialect_not_found(&self, dialect: &str) -> CoreError {
        CoreError::DialectNotFound {
            module: self.name.to_string(),
            dialect: dialect.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "module_test.rs"]
mod tests;
