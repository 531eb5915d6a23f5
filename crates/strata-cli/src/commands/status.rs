//! Status command implementation - prints the execution ledger

use anyhow::{Context, Result};
use strata_core::LedgerEntry;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{column_width, print_json};
use crate::context::RuntimeContext;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let ledger = ctx.ledger()?;

    let entries = if ledger.exists().await? {
        ledger
            .history(args.module.as_deref())
            .await
            .context("Failed to read execution ledger")?
    } else {
        log::info!("Ledger table '{}' does not exist yet", ledger.table());
        Vec::new()
    };

    match args.output {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
    }
    Ok(())
}

fn print_table(entries: &[LedgerEntry]) {
    if entries.is_empty() {
        println!("No scripts applied");
        return;
    }

    let versions: Vec<String> = entries.iter().map(|e| e.version.to_string()).collect();
    let module_width = column_width(entries.iter().map(|e| e.module.as_str()), 6);
    let version_width = column_width(versions.iter().map(String::as_str), 7);
    let script_width = column_width(entries.iter().map(|e| e.script_name.as_str()), 6);

    println!(
        "{:<module_width$}  {:<version_width$}  {:<script_width$}  APPLIED_AT",
        "MODULE", "VERSION", "SCRIPT"
    );
    println!(
        "{:-<module_width$}  {:-<version_width$}  {:-<script_width$}  {}",
        "",
        "",
        "",
        "-".repeat(23)
    );
    for (entry, version) in entries.iter().zip(&versions) {
        println!(
            "{:<module_width$}  {:<version_width$}  {:<script_width$}  {}",
            entry.module.as_str(),
            version,
            entry.script_name,
            entry.applied_at.format("%Y-%m-%d %H:%M:%S%.3f")
        );
    }
    println!("\n{} script(s) applied", entries.len());
}
