//! Declarative grading checks evaluated against a submission handle.
//!
//! A check that finds the submission lacking (missing scope, index out of
//! range, wrong statement shape) fails with an explanatory message. Problems
//! with the suite itself, such as an expected snippet that does not parse,
//! abort the run with an error instead.

pub mod types;

pub use types::{Check, CheckOutcome, CheckSpec, Scope, SuiteReport};

use tracing::{debug, info};

use crate::core::config::CheckSuite;
use crate::core::errors::{PyshapeError, Result};
use crate::handle::Handle;
use crate::lang::literal::Literal;

/// Run every check of `suite` against `submission`.
pub fn run_suite(suite: &CheckSuite, submission: &Handle) -> Result<SuiteReport> {
    let mut outcomes = Vec::with_capacity(suite.checks.len());
    let mut failed = 0;

    for (position, spec) in suite.checks.iter().enumerate() {
        let outcome = run_check(spec, position + 1, submission)?;
        debug!(id = %outcome.id, passed = outcome.passed, "evaluated check");
        if !outcome.passed {
            failed += 1;
        }
        outcomes.push(outcome);
        if failed > 0 && suite.fail_fast {
            break;
        }
    }

    let report = SuiteReport {
        suite: suite.name.clone(),
        passed: outcomes.len() - failed,
        failed,
        skipped: suite.checks.len() - outcomes.len(),
        outcomes,
    };
    info!(
        suite = %report.suite,
        passed = report.passed,
        failed = report.failed,
        skipped = report.skipped,
        "check suite finished"
    );
    Ok(report)
}

/// Evaluate a single check; `position` is 1-based and only used for labels.
pub fn run_check(spec: &CheckSpec, position: usize, submission: &Handle) -> Result<CheckOutcome> {
    let id = spec.label(position);
    let result = resolve_scope(&spec.scope, submission).and_then(|target| match target {
        Some(target) => evaluate(&spec.check, &target),
        None => Ok((false, format!("{} not found", spec.scope.describe()))),
    });

    let (passed, message) = match result {
        Ok(verdict) => verdict,
        Err(err @ (PyshapeError::Index { .. } | PyshapeError::InvalidOperation { .. })) => {
            (false, format!("{}: {err}", spec.scope.describe()))
        }
        Err(err) => return Err(err),
    };
    Ok(CheckOutcome {
        id,
        passed,
        message,
    })
}

/// Narrow the submission to the check's scope; `None` when a named
/// declaration is missing.
fn resolve_scope(scope: &Scope, submission: &Handle) -> Result<Option<Handle>> {
    let mut target = submission.clone();
    if let Some(class) = &scope.class {
        target = target.find_class(class);
    }
    if let Some(function) = &scope.function {
        target = target.find_function(function);
    }
    if target.is_missing() {
        return Ok(None);
    }
    for &index in &scope.index {
        target = target.get(index)?;
    }
    Ok(Some(target))
}

fn evaluate(check: &Check, target: &Handle) -> Result<(bool, String)> {
    let verdict = match check {
        Check::HasFunction { name } => presence(target.has_function(name), "function", name),
        Check::HasClass { name } => presence(target.has_class(name), "class", name),
        Check::HasVariable { name } => presence(target.has_variable(name), "variable", name),
        Check::VariableEquals { name, value } => {
            if !target.has_variable(name) {
                (false, format!("variable `{name}` is not assigned"))
            } else {
                match target.get_variable(name) {
                    Some(actual) if literal_matches(&actual, value) => {
                        (true, format!("`{name}` is {actual}"))
                    }
                    Some(actual) => (
                        false,
                        format!("expected `{name}` to be {value}, found {actual}"),
                    ),
                    None => (
                        false,
                        format!("expected `{name}` to be {value}, found a non-literal value"),
                    ),
                }
            }
        }
        Check::VariableIsInteger { name } => {
            let variable = target.find_variable(name);
            if variable.is_missing() {
                (false, format!("variable `{name}` is not assigned"))
            } else if variable.is_integer() {
                (true, format!("`{name}` is an integer"))
            } else {
                (false, format!("`{name}` is not assigned an integer literal"))
            }
        }
        Check::VariableIsCall { name, function } => {
            let variable = target.find_variable(name);
            if variable.is_missing() {
                (false, format!("variable `{name}` is not assigned"))
            } else if variable.value_is_call(function) {
                (true, format!("`{name}` is assigned the result of `{function}()`"))
            } else {
                (false, format!("`{name}` is not assigned the result of `{function}()`"))
            }
        }
        Check::Equivalent { source } => {
            if target.is_equivalent(source)? {
                (true, "code matches the expected snippet".to_string())
            } else {
                let found = target.unparse().unwrap_or_default();
                (false, format!("expected `{source}`, found `{found}`"))
            }
        }
        Check::Conditions { expected } => conditions_match(target, expected)?,
        Check::IfCount { count } => {
            let found = target.find_ifs().len();
            (
                found == *count,
                format!("expected {count} if statement(s), found {found}"),
            )
        }
    };
    Ok(verdict)
}

fn presence(found: bool, what: &str, name: &str) -> (bool, String) {
    if found {
        (true, format!("{what} `{name}` is defined"))
    } else {
        (false, format!("{what} `{name}` is not defined"))
    }
}

fn conditions_match(target: &Handle, expected: &[serde_json::Value]) -> Result<(bool, String)> {
    let actual = target.find_conditions()?;
    if actual.len() != expected.len() {
        return Ok((
            false,
            format!(
                "expected {} branch(es), found {}",
                expected.len(),
                actual.len()
            ),
        ));
    }

    for (position, (condition, value)) in actual.iter().zip(expected).enumerate() {
        let wanted = Handle::try_from(value)?;
        let matches = match wanted.unparse() {
            None => condition.is_missing(),
            Some(source) => condition.is_equivalent(&source)?,
        };
        if !matches {
            let describe = |handle: &Handle| handle.unparse().unwrap_or_else(|| "else".to_string());
            return Ok((
                false,
                format!(
                    "branch {}: expected `{}`, found `{}`",
                    position + 1,
                    describe(&wanted),
                    describe(condition)
                ),
            ));
        }
    }
    Ok((true, format!("all {} branch(es) match", expected.len())))
}

/// Compare an extracted literal with a suite value. Integers and floats
/// compare numerically; other types must match exactly.
fn literal_matches(actual: &Literal, expected: &serde_json::Value) -> bool {
    match (actual, expected) {
        (Literal::Int(value), serde_json::Value::Number(number)) => {
            number.as_i64() == Some(*value) || number.as_f64() == Some(*value as f64)
        }
        (Literal::Float(value), serde_json::Value::Number(number)) => {
            number.as_f64() == Some(*value)
        }
        (Literal::Str(value), serde_json::Value::String(text)) => value == text,
        (Literal::Bool(value), serde_json::Value::Bool(flag)) => value == flag,
        _ => false,
    }
}
