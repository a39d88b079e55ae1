//! Pyshape CLI - structural checks for Python submissions.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // RUST_LOG wins over the --verbose default
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check(args) => cli::check_command(args),
        Commands::Dump(args) => cli::dump_command(args),
        Commands::Unparse(args) => cli::unparse_command(args),
        Commands::Equivalent(args) => cli::equivalent_command(args),
    }
}
