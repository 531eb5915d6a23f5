//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use strata_core::ModuleRegistry;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main maps it to the process exit status.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Pretty-print `value` as JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{json}");
    Ok(())
}

/// Fail unless `module` is registered.
pub(crate) fn require_module(registry: &ModuleRegistry, module: &str) -> Result<()> {
    if registry.get(module).is_none() {
        anyhow::bail!(
            "Module '{}' is not listed in the project config (known: {})",
            module,
            registry
                .modules()
                .iter()
                .map(|m| m.name().as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}

/// Width of the widest value in `values`, at least `min`.
pub(crate) fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize) -> usize {
    values.map(str::len).max().unwrap_or(min).max(min)
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
