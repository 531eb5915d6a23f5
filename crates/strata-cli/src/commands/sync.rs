//! Sync command implementation - applies pending upgrade scripts

use anyhow::{Context, Result};
use serde::Serialize;
use strata_db::DatabaseCore;
use strata_migrate::{ModuleReport, SyncReport};

use crate::cli::{GlobalArgs, OutputFormat, SyncArgs};
use crate::commands::common::{print_json, require_module};
use crate::context::RuntimeContext;

/// One applied script, as printed by `--output json`.
#[derive(Debug, Serialize)]
struct AppliedScript<'a> {
    module: &'a str,
    version: String,
    script: &'a str,
}

/// Execute the sync command
pub(crate) async fn execute(args: &SyncArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let mut engine = ctx.engine()?;

    let report = match &args.module {
        Some(module) => {
            require_module(engine.registry(), module)?;
            if let Some(version) = &args.to_version {
                engine
                    .registry_mut()
                    .set_target_version(module, version)
                    .with_context(|| format!("Failed to re-target '{module}' to {version}"))?;
            }

            let descriptors: Vec<_> = engine
                .registry()
                .modules()
                .iter()
                .filter(|m| m.name().as_str() == module.as_str())
                .cloned()
                .collect();
            let mut report = SyncReport::default();
            for descriptor in &descriptors {
                report.modules.push(
                    engine
                        .sync_module(descriptor)
                        .await
                        .with_context(|| format!("Sync failed for module '{module}'"))?,
                );
            }
            report
        }
        None => engine.sync().await.context("Sync failed")?,
    };

    match args.output {
        OutputFormat::Table => print_report(&report, ctx.db.db_type(), engine.dialect()),
        OutputFormat::Json => print_json(&applied_scripts(&report))?,
    }
    Ok(())
}

fn applied_scripts(report: &SyncReport) -> Vec<AppliedScript<'_>> {
    report
        .modules
        .iter()
        .flat_map(|m| {
            m.applied.iter().map(move |entry| AppliedScript {
                module: m.module.as_str(),
                version: entry.version.to_string(),
                script: &entry.script_name,
            })
        })
        .collect()
}

fn print_report(report: &SyncReport, db_type: &str, dialect: &str) {
    println!(
        "Synced {} module(s) on {} (dialect: {})\n",
        report.modules.len(),
        db_type,
        dialect
    );
    for module in &report.modules {
        print_module(module);
    }
    println!("\n{} script(s) applied", report.total_applied());
}

fn print_module(module: &ModuleReport) {
    if module.applied.is_empty() {
        println!("  {}: up to date", module.module);
        return;
    }
    println!("  {}: {} script(s)", module.module, module.applied.len());
    for entry in &module.applied {
        println!("    {:<10} {}", entry.version.to_string(), entry.script_name);
    }
}
