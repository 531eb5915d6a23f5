//! strata-core - Core library for Strata
//!
//! This crate provides version parsing and ordering, module descriptors,
//! per-dialect version chains, the module registry, ledger records and
//! project configuration shared by the other Strata crates.

pub mod chain;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ledger;
pub mod module;
pub mod module_name;
pub mod registry;
pub mod sql_utils;
pub mod version;

pub use chain::{LinkOrder, VersionChain, VersionLookup, VersionNode};
pub use config::{Config, DatabaseConfig, DbType};
pub use descriptor::{ModuleSpec, VersionSpec};
pub use error::{CoreError, CoreResult};
pub use ledger::LedgerEntry;
pub use module::ModuleDescriptor;
pub use module_name::ModuleName;
pub use registry::ModuleRegistry;
pub use version::{compare_versions, comparison_key, VersionParameters};
