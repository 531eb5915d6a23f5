//! Plan command implementation - lists pending upgrade scripts

use anyhow::{Context, Result};
use serde::Serialize;
use strata_migrate::ModulePlan;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common::{column_width, print_json, require_module, ExitCode};
use crate::context::RuntimeContext;

/// One pending script, as printed by `--output json`.
#[derive(Debug, Serialize)]
struct PlannedScript<'a> {
    module: &'a str,
    dialect: &'a str,
    version: &'a str,
    script: &'a str,
    path: String,
}

/// Execute the plan command
pub(crate) async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let engine = ctx.engine()?;
    if let Some(module) = &args.module {
        require_module(engine.registry(), module)?;
    }

    let plans: Vec<ModulePlan> = engine
        .plan()
        .await
        .context("Failed to plan sync")?
        .into_iter()
        .filter(|plan| args.module.as_deref().map_or(true, |m| plan.module == m))
        .collect();

    let pending: Vec<PlannedScript<'_>> = plans
        .iter()
        .flat_map(|plan| {
            plan.scripts.iter().map(move |script| PlannedScript {
                module: plan.module.as_str(),
                dialect: &plan.dialect,
                version: &script.version,
                script: &script.script,
                path: script.path.display().to_string(),
            })
        })
        .collect();

    match args.output {
        OutputFormat::Table => print_table(&plans, &pending),
        OutputFormat::Json => print_json(&pending)?,
    }

    if args.exit_code && !pending.is_empty() {
        return Err(ExitCode(2).into());
    }
    Ok(())
}

fn print_table(plans: &[ModulePlan], pending: &[PlannedScript<'_>]) {
    for plan in plans.iter().filter(|p| p.is_empty()) {
        let applied = plan
            .applied
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}: up to date (applied {}, target {})",
            plan.module, applied, plan.target
        );
    }
    if pending.is_empty() {
        println!("\nNothing to apply");
        return;
    }

    let module_width = column_width(pending.iter().map(|p| p.module), 6);
    let version_width = column_width(pending.iter().map(|p| p.version), 7);

    println!();
    println!(
        "{:<module_width$}  {:<version_width$}  SCRIPT",
        "MODULE", "VERSION"
    );
    println!("{:-<module_width$}  {:-<version_width$}  {}", "", "", "-".repeat(30));
    for script in pending {
        println!(
            "{:<module_width$}  {:<version_width$}  {}",
            script.module, script.version, script.script
        );
    }
    println!("\n{} script(s) pending", pending.len());
}
