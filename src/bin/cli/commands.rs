//! Command execution for the `pyshape` binary.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{debug, info};

use pyshape::{run_suite, CheckSuite, Handle, PyshapeError};

use crate::cli::args::{CheckArgs, DumpArgs, EquivalentArgs, ReportFormat, UnparseArgs};
use crate::cli::output;

/// Exit code when a check fails or code is not equivalent.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the submission does not parse.
pub const EXIT_UNPARSEABLE: u8 = 2;

/// Run a check suite against a submission
pub fn check_command(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let suite = CheckSuite::from_path(&args.suite)
        .with_context(|| format!("Failed to load check suite {}", args.suite.display()))?;

    let submission = match load_submission(&args.file)? {
        Ok(handle) => handle,
        Err(err) => return Ok(unparseable(&args.file, &err)),
    };

    info!(suite = %suite.name, file = %args.file.display(), "running check suite");
    let report = run_suite(&suite, &submission)?;

    match args.format {
        ReportFormat::Text => output::print_report(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILED))
    }
}

/// Print the tree of a submission, optionally narrowed by statement indices
pub fn dump_command(args: DumpArgs) -> anyhow::Result<ExitCode> {
    let submission = match load_submission(&args.file)? {
        Ok(handle) => handle,
        Err(err) => return Ok(unparseable(&args.file, &err)),
    };
    let target = descend(submission, &args.indices)?;

    if args.json {
        println!("{}", output::tree_json(&target)?);
    } else {
        println!("{target}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the canonical form of a submission
pub fn unparse_command(args: UnparseArgs) -> anyhow::Result<ExitCode> {
    let submission = match load_submission(&args.file)? {
        Ok(handle) => handle,
        Err(err) => return Ok(unparseable(&args.file, &err)),
    };
    if let Some(text) = submission.unparse() {
        println!("{text}");
    }
    Ok(ExitCode::SUCCESS)
}

/// Compare part of a submission with an expected snippet
pub fn equivalent_command(args: EquivalentArgs) -> anyhow::Result<ExitCode> {
    let submission = match load_submission(&args.file)? {
        Ok(handle) => handle,
        Err(err) => return Ok(unparseable(&args.file, &err)),
    };
    let target = descend(submission, &args.indices)?;

    let equivalent = target
        .is_equivalent(&args.snippet)
        .context("Expected snippet is not valid Python")?;
    println!("{equivalent}");

    if equivalent {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_FAILED))
    }
}

/// Read and parse a submission. I/O problems are errors; a submission that
/// does not parse is returned as the inner error so callers can report it
/// with a dedicated exit code.
fn load_submission(path: &Path) -> anyhow::Result<pyshape::Result<Handle>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read submission {}", path.display()))?;
    debug!(file = %path.display(), bytes = source.len(), "read submission");
    Ok(Handle::parse(&source))
}

fn descend(mut handle: Handle, indices: &[usize]) -> pyshape::Result<Handle> {
    for &index in indices {
        handle = handle.get(index)?;
    }
    Ok(handle)
}

fn unparseable(path: &Path, err: &PyshapeError) -> ExitCode {
    output::print_parse_error(path, err);
    ExitCode::from(EXIT_UNPARSEABLE)
}
