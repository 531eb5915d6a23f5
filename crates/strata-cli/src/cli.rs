//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Strata - apply versioned SQL upgrade scripts per module
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(
        short = 'p',
        long,
        global = true,
        default_value = ".",
        env = "STRATA_PROJECT_DIR"
    )]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true, env = "STRATA_CONFIG")]
    pub config: Option<String>,

    /// Override the database path from the config
    #[arg(short, long, global = true, env = "STRATA_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new Strata project
    Init(InitArgs),

    /// Apply pending upgrade scripts
    Sync(SyncArgs),

    /// Show pending upgrade scripts without running them
    Plan(PlanArgs),

    /// Show the execution ledger
    Status(StatusArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Project name (also the directory created)
    pub name: String,

    /// Database path written to strata.yml
    #[arg(long, default_value = "strata.duckdb")]
    pub database_path: String,
}

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Only sync this module
    #[arg(short, long)]
    pub module: Option<String>,

    /// Re-target the module before syncing
    #[arg(long, requires = "module")]
    pub to_version: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Only plan this module
    #[arg(short, long)]
    pub module: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Exit with code 2 when scripts are pending
    #[arg(long)]
    pub exit_code: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Only show entries for this module
    #[arg(short, long)]
    pub module: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Output formats shared by the reporting commands
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
