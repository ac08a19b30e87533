use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod compile;
mod config;
mod document;
mod manuscript;
mod paths;
mod report;
mod scan;
mod table;
mod util;
mod workflow;

use cli::{Command, RootArgs};

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "PMAN_LOG";

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Build(args) => workflow::run_build(args),
        Command::Scan(args) => workflow::run_scan(args),
        Command::InitConfig(args) => workflow::run_init_config(args),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
