//! Error types for the pyshape library.
//!
//! Parsing, positional access and shape-dependent operations each have a
//! dedicated variant so callers can tell a learner's syntax error apart from
//! a misuse of the handle API. "Not found" is never an error: finders return
//! the empty handle instead.

use std::io;

use thiserror::Error;

/// Main result type for pyshape operations.
pub type Result<T> = std::result::Result<T, PyshapeError>;

/// Error type for all pyshape operations.
#[derive(Error, Debug)]
pub enum PyshapeError {
    /// Source text is not valid syntax of the inspected language
    #[error("Parse error in {language}: {message}")]
    Parse {
        /// Language being parsed
        language: String,
        /// Error description
        message: String,
        /// Line number, 1-based (if available)
        line: Option<usize>,
        /// Column number, 1-based (if available)
        column: Option<usize>,
    },

    /// Positional access outside the handle's elements
    #[error("Index {index} out of range for handle of length {len}")]
    Index {
        /// Requested position
        index: usize,
        /// Number of elements available
        len: usize,
    },

    /// Operation invoked on a handle of the wrong shape
    #[error("Invalid operation '{operation}' on {found}")]
    InvalidOperation {
        /// Operation that was attempted
        operation: String,
        /// Shape the handle actually had
        found: String,
    },

    /// Construction input that is neither text, a node, nor absence
    #[error("Type error: {message}")]
    Type {
        /// Error description
        message: String,
    },

    /// I/O related errors (reading submissions and suites)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Validation errors for suite definitions
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data format being processed
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PyshapeError {
    /// Create a new parse error
    pub fn parse(language: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Create a new parse error with a source position
    pub fn parse_at(
        language: impl Into<String>,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self::Parse {
            language: language.into(),
            message: message.into(),
            line: Some(line),
            column: Some(column),
        }
    }

    /// Create a new index error
    pub fn index(index: usize, len: usize) -> Self {
        Self::Index { index, len }
    }

    /// Create a new invalid operation error
    pub fn invalid_operation(operation: impl Into<String>, found: impl Into<String>) -> Self {
        Self::InvalidOperation {
            operation: operation.into(),
            found: found.into(),
        }
    }

    /// Create a new type error
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Whether this error reports invalid source text
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// Prefix the message with additional context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Io { message, .. }
            | Self::Config { message, .. }
            | Self::Validation { message, .. }
            | Self::Serialization { message, .. } => {
                *message = format!("{}: {}", context.into(), message);
            }
            _ => {} // Core taxonomy errors keep their original message
        }
        self
    }
}

impl From<io::Error> for PyshapeError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for PyshapeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for PyshapeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add lazily built context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PyshapeError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PyshapeError::parse("python", "invalid syntax");
        assert!(matches!(err, PyshapeError::Parse { .. }));
        assert!(err.is_parse());

        let err = PyshapeError::index(3, 2);
        assert!(matches!(err, PyshapeError::Index { index: 3, len: 2 }));
        assert!(!err.is_parse());
    }

    #[test]
    fn test_parse_at_location() {
        let err = PyshapeError::parse_at("python", "unexpected token", 4, 7);

        if let PyshapeError::Parse {
            language,
            message,
            line,
            column,
        } = err
        {
            assert_eq!(language, "python");
            assert_eq!(message, "unexpected token");
            assert_eq!(line, Some(4));
            assert_eq!(column, Some(7));
        } else {
            panic!("Expected Parse error");
        }
    }

    #[test]
    fn test_invalid_operation_display() {
        let err = PyshapeError::invalid_operation("find_conditions", "module");
        assert_eq!(
            err.to_string(),
            "Invalid operation 'find_conditions' on module"
        );
    }

    #[test]
    fn test_index_display() {
        let err = PyshapeError::index(5, 1);
        assert_eq!(
            err.to_string(),
            "Index 5 out of range for handle of length 1"
        );
    }

    #[test]
    fn test_validation_field_error() {
        let err = PyshapeError::validation_field("must not be empty", "checks");

        if let PyshapeError::Validation { message, field } = err {
            assert_eq!(message, "must not be empty");
            assert_eq!(field, Some("checks".to_string()));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_with_context_prefixes_ambient_errors() {
        let err = PyshapeError::config_field("unsupported suite format", "suite")
            .with_context("suite.toml");

        if let PyshapeError::Config { message, .. } = err {
            assert_eq!(message, "suite.toml: unsupported suite format");
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_with_context_leaves_taxonomy_errors() {
        let err = PyshapeError::type_error("expected string or null").with_context("ignored");

        if let PyshapeError::Type { message } = err {
            assert_eq!(message, "expected string or null");
        } else {
            panic!("Expected Type error");
        }
    }

    #[test]
    fn test_result_extension() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        let err = result
            .with_context(|| "Failed to read submission".to_string())
            .unwrap_err();
        if let PyshapeError::Io { message, source } = err {
            assert_eq!(message, "Failed to read submission: I/O operation failed");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        } else {
            panic!("Expected Io error");
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: PyshapeError = json_err.into();

        if let PyshapeError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("JSON".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: PyshapeError = yaml_err.into();

        if let PyshapeError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("YAML".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }
}
