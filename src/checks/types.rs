//! Check definitions and outcome types.

use serde::{Deserialize, Serialize};

/// Narrows the submission before a check runs.
///
/// Resolution order is class, then function (inside the class when both are
/// given), then each statement index in turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Top-level class to descend into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Function to descend into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    /// Statement positions to descend through
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index: Vec<usize>,
}

impl Scope {
    /// Whether the scope is the whole submission
    pub fn is_root(&self) -> bool {
        self.class.is_none() && self.function.is_none() && self.index.is_empty()
    }

    /// Human-readable path, e.g. `class Shape > def area > [0]`
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(class) = &self.class {
            parts.push(format!("class {class}"));
        }
        if let Some(function) = &self.function {
            parts.push(format!("def {function}"));
        }
        parts.extend(self.index.iter().map(|i| format!("[{i}]")));
        if parts.is_empty() {
            "submission".to_string()
        } else {
            parts.join(" > ")
        }
    }
}

/// A single expectation about the submission's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Check {
    /// A function with this name is defined
    HasFunction {
        /// Function name
        name: String,
    },
    /// A class with this name is defined
    HasClass {
        /// Class name
        name: String,
    },
    /// A variable with this name is assigned
    HasVariable {
        /// Variable name
        name: String,
    },
    /// A variable is assigned this literal value
    VariableEquals {
        /// Variable name
        name: String,
        /// Expected number, string or boolean
        value: serde_json::Value,
    },
    /// A variable is assigned an integer literal
    VariableIsInteger {
        /// Variable name
        name: String,
    },
    /// A variable is assigned the result of calling a named function
    VariableIsCall {
        /// Variable name
        name: String,
        /// Called function
        function: String,
    },
    /// The scoped code is equivalent to a snippet
    Equivalent {
        /// Expected source
        source: String,
    },
    /// The scoped conditional tests these conditions, `null` for `else`
    Conditions {
        /// Expected condition sources in order
        expected: Vec<serde_json::Value>,
    },
    /// The scope holds this many top-level `if` statements
    IfCount {
        /// Expected number of `if` statements
        count: usize,
    },
}

impl Check {
    /// Snake-case kind name, as written in suite files
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::HasFunction { .. } => "has_function",
            Self::HasClass { .. } => "has_class",
            Self::HasVariable { .. } => "has_variable",
            Self::VariableEquals { .. } => "variable_equals",
            Self::VariableIsInteger { .. } => "variable_is_integer",
            Self::VariableIsCall { .. } => "variable_is_call",
            Self::Equivalent { .. } => "equivalent",
            Self::Conditions { .. } => "conditions",
            Self::IfCount { .. } => "if_count",
        }
    }
}

/// A check as written in a suite file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckSpec {
    /// Identifier shown in reports; defaults to `<kind>#<position>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Part of the submission the check applies to
    #[serde(default, skip_serializing_if = "Scope::is_root")]
    pub scope: Scope,
    /// The expectation itself
    #[serde(flatten)]
    pub check: Check,
}

impl CheckSpec {
    /// Create an unscoped, unnamed check
    pub fn new(check: Check) -> Self {
        Self {
            id: None,
            scope: Scope::default(),
            check,
        }
    }

    /// Set the scope
    pub fn in_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the report identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Identifier for reports, given the check's 1-based position
    pub fn label(&self, position: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}#{}", self.check.kind_name(), position))
    }
}

/// Result of evaluating one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Check identifier
    pub id: String,
    /// Whether the expectation held
    pub passed: bool,
    /// Explanation suitable for showing to the learner
    pub message: String,
}

/// Result of running a whole suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Suite name
    pub suite: String,
    /// Number of checks that passed
    pub passed: usize,
    /// Number of checks that failed
    pub failed: usize,
    /// Checks not run because an earlier one failed under `fail_fast`
    pub skipped: usize,
    /// Outcome per evaluated check, in suite order
    pub outcomes: Vec<CheckOutcome>,
}

impl SuiteReport {
    /// Whether every check ran and passed
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}
