//! Error types for yamlator
//!
//! This module defines all error types used throughout the library.
//! Validation failures are never errors; they are reported as
//! [`Violation`](crate::violations::Violation) records instead.

use std::fmt;
use thiserror::Error;

/// Result type alias using yamlator Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for yamlator operations
#[derive(Error, Debug)]
pub enum Error {
    /// Schema syntax error
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    /// Union type containing another union
    #[error("nested union: {0}")]
    NestedUnion(String),

    /// Reference to a ruleset or enum that does not exist
    #[error("construct not found: {0}")]
    ConstructNotFound(String),

    /// Cycle in the schema dependency graph
    #[error("cycle detected: {0}")]
    CycleDependency(String),

    /// Schema file without the expected extension
    #[error("invalid schema filename: {0}")]
    SchemaFilename(String),

    /// Value error (empty or invalid argument)
    #[error("value error: {0}")]
    Value(String),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Category of a schema syntax error
///
/// All categories share the same structure; they exist to make the
/// message actionable and to let callers match on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Unexpected token or character
    Unexpected,
    /// Ruleset name that does not start with an uppercase letter
    MalformedRulesetName,
    /// Enum name that does not start with an uppercase letter
    MalformedEnumName,
    /// Ruleset or schema block with no rules
    MissingRules,
}

/// Schema syntax error with position context
#[derive(Debug, Clone)]
pub struct SyntaxError {
    /// Error category
    pub kind: SyntaxErrorKind,
    /// Error message
    pub message: String,
    /// 1-based line of the offending token
    pub line: Option<usize>,
    /// 1-based column of the offending token
    pub column: Option<usize>,
    /// The offending source line
    pub context: Option<String>,
}

impl SyntaxError {
    /// Create a new generic syntax error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: SyntaxErrorKind::Unexpected,
            message: message.into(),
            line: None,
            column: None,
            context: None,
        }
    }

    /// Create an error for a ruleset name that is not uppercase-first
    pub fn malformed_ruleset_name(name: impl fmt::Display) -> Self {
        let mut err = Self::new(format!(
            "malformed ruleset name '{}': ruleset names must begin with an uppercase letter",
            name
        ));
        err.kind = SyntaxErrorKind::MalformedRulesetName;
        err
    }

    /// Create an error for an enum name that is not uppercase-first
    pub fn malformed_enum_name(name: impl fmt::Display) -> Self {
        let mut err = Self::new(format!(
            "malformed enum name '{}': enum names must begin with an uppercase letter",
            name
        ));
        err.kind = SyntaxErrorKind::MalformedEnumName;
        err
    }

    /// Create an error for a block that declares no rules
    pub fn missing_rules(block: impl fmt::Display) -> Self {
        let mut err = Self::new(format!("'{}' must declare at least one rule", block));
        err.kind = SyntaxErrorKind::MissingRules;
        err
    }

    /// Set the line and column of the offending token
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Set the offending source line
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " at line {} column {}", line, column)?;
        }

        if let Some(ref context) = self.context {
            write!(f, "\n    {}", context.trim_end())?;
        }

        Ok(())
    }
}

impl std::error::Error for SyntaxError {}
