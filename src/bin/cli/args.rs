//! CLI Argument Structures
//!
//! Command and argument definitions for the `pyshape` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Structural queries and equivalence checks over Python snippets
#[derive(Parser)]
#[command(name = "pyshape")]
#[command(version = VERSION)]
#[command(about = "Pyshape - structural checks for Python submissions")]
#[command(long_about = "
Parse Python submissions and check their shape: which functions, classes
and variables they define, what their conditionals test, and whether a
piece of code is equivalent to an expected snippet.

Common Usage:

  # Grade a submission against a check suite
  pyshape check solution.py --suite lesson.yml

  # Machine-readable results
  pyshape check solution.py --suite lesson.yml --format json

  # Inspect the first statement of a submission
  pyshape dump solution.py --index 0

  # Compare a statement with an expected snippet
  pyshape equivalent solution.py 'total = a + b' --index 2
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a check suite against a submission
    Check(CheckArgs),

    /// Print the syntax tree of a submission
    Dump(DumpArgs),

    /// Print the canonical form of a submission
    Unparse(UnparseArgs),

    /// Test whether part of a submission is equivalent to a snippet
    Equivalent(EquivalentArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Python file to grade
    pub file: PathBuf,

    /// Check suite (YAML, or JSON with a .json extension)
    #[arg(short, long)]
    pub suite: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct DumpArgs {
    /// Python file to inspect
    pub file: PathBuf,

    /// Statement index to descend into (repeatable)
    #[arg(short, long = "index", value_name = "N")]
    pub indices: Vec<usize>,

    /// Emit the tree as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct UnparseArgs {
    /// Python file to render
    pub file: PathBuf,
}

#[derive(Args)]
pub struct EquivalentArgs {
    /// Python file holding the submission
    pub file: PathBuf,

    /// Expected Python source
    pub snippet: String,

    /// Statement index to descend into before comparing (repeatable)
    #[arg(short, long = "index", value_name = "N")]
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Coloured human-readable summary
    Text,
    /// JSON suite report
    Json,
}
