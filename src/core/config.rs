//! Check suite configuration.
//!
//! Suites are written in YAML (or JSON) by whoever grades the submissions:
//!
//! ```yaml
//! name: loops-lesson
//! fail_fast: false
//! checks:
//!   - kind: has_function
//!     name: total
//!   - kind: conditions
//!     scope: { function: classify, index: [0] }
//!     expected: ["n > 0", "n < 0", null]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::checks::{Check, CheckSpec};
use crate::core::errors::{PyshapeError, Result, ResultExt};

/// A named list of checks to run against one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSuite {
    /// Suite name shown in reports
    pub name: String,
    /// Optional free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Stop evaluating after the first failed check
    #[serde(default)]
    pub fail_fast: bool,
    /// Checks in evaluation order
    pub checks: Vec<CheckSpec>,
}

impl CheckSuite {
    /// Create a suite from checks
    pub fn new(name: impl Into<String>, checks: Vec<CheckSpec>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fail_fast: false,
            checks,
        }
    }

    /// Parse and validate a YAML suite
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let suite: Self = serde_yaml::from_str(content)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Parse and validate a JSON suite
    pub fn from_json_str(content: &str) -> Result<Self> {
        let suite: Self = serde_json::from_str(content)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Load a suite file. `.json` files are read as JSON; `.yml`, `.yaml`
    /// and extensionless files as YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        let is_json = match extension.as_deref() {
            Some("json") => true,
            Some("yml" | "yaml") | None => false,
            Some(other) => {
                return Err(PyshapeError::config_field(
                    format!("unsupported suite format '.{other}'"),
                    "suite",
                )
                .with_context(path.display().to_string()));
            }
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read suite {}", path.display()))?;
        let suite = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .with_context(|| path.display().to_string())?;

        debug!(suite = %suite.name, checks = suite.checks.len(), "loaded check suite");
        Ok(suite)
    }

    /// Validate suite structure.
    ///
    /// Snippets are not parsed here; a snippet that fails to parse is
    /// reported when the suite runs.
    pub fn validate(&self) -> Result<()> {
        validate_non_empty(&self.name, "name")?;
        if self.checks.is_empty() {
            return Err(PyshapeError::validation_field(
                "suite must contain at least one check",
                "checks",
            ));
        }

        let mut seen = HashSet::new();
        for (position, spec) in self.checks.iter().enumerate() {
            let field = format!("checks[{position}]");
            if let Some(id) = &spec.id {
                validate_non_empty(id, &format!("{field}.id"))?;
                if !seen.insert(id.as_str()) {
                    warn!(id = %id, "duplicate check id in suite");
                }
            }
            validate_check(&spec.check, &field)?;
        }
        Ok(())
    }
}

fn validate_check(check: &Check, field: &str) -> Result<()> {
    match check {
        Check::HasFunction { name }
        | Check::HasClass { name }
        | Check::HasVariable { name }
        | Check::VariableIsInteger { name } => validate_non_empty(name, &format!("{field}.name")),
        Check::VariableEquals { name, value } => {
            validate_non_empty(name, &format!("{field}.name"))?;
            if value.is_number() || value.is_string() || value.is_boolean() {
                Ok(())
            } else {
                Err(PyshapeError::validation_field(
                    "expected value must be a number, string or boolean",
                    format!("{field}.value"),
                ))
            }
        }
        Check::VariableIsCall { name, function } => {
            validate_non_empty(name, &format!("{field}.name"))?;
            validate_non_empty(function, &format!("{field}.function"))
        }
        Check::Equivalent { .. } | Check::IfCount { .. } => Ok(()),
        Check::Conditions { expected } => {
            if expected.is_empty() {
                Err(PyshapeError::validation_field(
                    "at least one expected condition is required",
                    format!("{field}.expected"),
                ))
            } else {
                Ok(())
            }
        }
    }
}

/// Validate that a string field is not blank.
pub fn validate_non_empty(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PyshapeError::validation_field(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}
