//! Init command implementation - scaffolds a new Strata project

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use strata_core::config::DEFAULT_LEDGER_TABLE;
use strata_core::{
    Config, DatabaseConfig, DbType, LinkOrder, ModuleName, ModuleSpec, VersionSpec,
};

use crate::cli::InitArgs;

const EXAMPLE_MODULE: &str = "example";
const EXAMPLE_SCRIPT: &str = "upgrade_1_0_0.sql";

/// Execute the init command
pub(crate) async fn execute(args: &InitArgs) -> Result<()> {
    // Reject names that could cause path traversal or confusing directory names
    if args.name.contains('/')
        || args.name.contains('\\')
        || args.name.contains("..")
        || args.name.starts_with('.')
        || args.name.starts_with('-')
    {
        anyhow::bail!(
            "Invalid project name '{}': must not contain '/', '\\', '..', or start with '.' or '-'",
            args.name
        );
    }

    let project_dir = Path::new(&args.name);
    if project_dir.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Choose a different project name.",
            args.name
        );
    }

    println!("Creating new Strata project: {}\n", args.name);
    let module_dir = project_dir.join("modules").join(EXAMPLE_MODULE);
    let descriptor_path = module_dir.join("module.yml");

    write_file(
        &project_dir.join("strata.yml"),
        &serde_yaml::to_string(&starter_config(args))?,
    )?;
    write_file(
        &descriptor_path,
        &serde_yaml::to_string(&starter_module())?,
    )?;
    write_file(
        &module_dir.join("duckdb").join(EXAMPLE_SCRIPT),
        "CREATE TABLE IF NOT EXISTS example_events (\n    id INTEGER PRIMARY KEY,\n    name VARCHAR NOT NULL\n);\n",
    )?;

    println!("Project created. Next steps:");
    println!("  cd {}", args.name);
    println!("  strata plan");
    println!("  strata sync");
    Ok(())
}

fn starter_config(args: &InitArgs) -> Config {
    Config {
        name: args.name.clone(),
        database: DatabaseConfig {
            db_type: DbType::DuckDb,
            path: args.database_path.clone(),
        },
        dialect: None,
        ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
        link_order: LinkOrder::default(),
        modules: vec![format!("modules/{EXAMPLE_MODULE}/module.yml")],
    }
}

fn starter_module() -> ModuleSpec {
    ModuleSpec {
        module: ModuleName::new(EXAMPLE_MODULE),
        dir: PathBuf::from("."),
        version: "1.0.0".to_string(),
        dialects: [(
            "duckdb".to_string(),
            vec![VersionSpec::new("1.0.0", [EXAMPLE_SCRIPT])],
        )]
        .into_iter()
        .collect(),
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("  created {}", path.display());
    Ok(())
}
