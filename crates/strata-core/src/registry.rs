//! Module registry.
//!
//! Holds every registered [`ModuleDescriptor`] in registration order, which
//! is also the order modules are synced in.

use crate::chain::LinkOrder;
use crate::descriptor::ModuleSpec;
use crate::error::{CoreError, CoreResult};
use crate::module::ModuleDescriptor;

/// Ordered collection of registered modules.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Vec<ModuleDescriptor>,
    link_order: LinkOrder,
}

impl ModuleRegistry {
    /// Empty registry using [`LinkOrder::Declaration`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty registry building chains with the given link order.
    pub fn with_link_order(link_order: LinkOrder) -> Self {
        Self {
            modules: Vec::new(),
            link_order,
        }
    }

    /// Link order applied to modules registered from now on.
    pub fn link_order(&self) -> LinkOrder {
        self.link_order
    }

    /// Build `spec`'s version chains and append it to the registry.
    ///
    /// Registering the same module name twice appends a second descriptor;
    /// both are synced, in registration order.
    pub fn add_module(&mut self, spec: ModuleSpec) -> CoreResult<()> {
        let descriptor = ModuleDescriptor::from_spec(spec, self.link_order)?;
        log::debug!(
            "Registered module '{}' at version {} ({} dialect(s))",
            descriptor.name(),
            descriptor.version(),
            descriptor.dialects().count()
        );
        self.modules.push(descriptor);
        Ok(())
    }

    /// Re-target every descriptor registered under `name`.
    ///
    /// Returns how many descriptors were updated.
    pub fn set_target_version(&mut self, name: &str, version: &str) -> CoreResult<usize> {
        let mut updated = 0;
        for module in self.modules.iter_mut().filter(|m| m.name() == &name) {
            module.set_target_version(version)?;
            updated += 1;
        }
        if updated == 0 {
            return Err(CoreError::ModuleNotFound {
                name: name.to_string(),
            });
        }
        Ok(updated)
    }

    /// First descriptor registered under `name`.
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.name() == &name)
    }

    /// All descriptors in registration order.
    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    /// Number of registered descriptors.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
