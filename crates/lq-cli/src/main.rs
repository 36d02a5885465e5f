//! Lineq CLI - table lineage extraction and data-quality tests

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{lineage, test};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result: Result<()> = match &cli.command {
        Commands::Lineage(args) => lineage::execute(args, &cli.global).await,
        Commands::Test(args) => test::execute(args, &cli.global).await,
    };

    if let Err(err) = result {
        match err.downcast_ref::<ExitCode>() {
            Some(code) => std::process::exit(code.0),
            None => {
                eprintln!("Error: {err:#}");
                std::process::exit(2);
            }
        }
    }
}

/// Warnings by default, info with `--verbose`; `RUST_LOG` wins when set
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
