//! ONVIF Scout CLI - Command-line WS-Discovery for ONVIF devices.
//!
//! This tool probes the local network for ONVIF-capable devices (IP
//! cameras, NVRs) and prints what replied, for use in scripts or by hand.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Discover(args) => commands::run_discover(args, cli.json).await,
    }
}
