// External crates
use clap::Parser;
use tracing_subscriber::EnvFilter;

// Internal imports
use dtaas_core::dtaas_error;

// Local modules
mod cli;
mod commands;

use cli::Args;
use commands::execute_command;

fn main() {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = execute_command(args) {
        dtaas_error!("Error: {}", e);
        std::process::exit(1);
    }
}
