//! Strata CLI - apply versioned SQL upgrade scripts per module

use clap::Parser;
use std::process;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::ExitCode;
use commands::{init, plan, status, sync};

#[tokio::main]
async fn main() -> process::ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match &cli.command {
        cli::Commands::Init(args) => init::execute(args).await,
        cli::Commands::Sync(args) => sync::execute(args, &cli.global).await,
        cli::Commands::Plan(args) => plan::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(code) => process::ExitCode::from(u8::try_from(code.0).unwrap_or(1)),
            None => {
                eprintln!("Error: {err:#}");
                process::ExitCode::FAILURE
            }
        },
    }
}
