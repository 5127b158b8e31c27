//! Validation violation records
//!
//! Violations are the only output of validation. They accumulate in
//! traversal order and are never deduplicated or reordered.

use std::fmt;

use serde::Serialize;

/// Category of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// A required key is missing
    Required,
    /// Data does not match the declared type
    Type,
    /// A key is not declared by a strict ruleset
    Strict,
}

impl ViolationKind {
    /// Get the lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Required => "required",
            ViolationKind::Type => "type",
            ViolationKind::Strict => "strict",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Data key the violation applies to
    pub key: String,
    /// Key of the containing structure
    pub parent: String,
    /// Human-readable description of the failure
    pub message: String,
    /// Violation category
    #[serde(rename = "violation_type")]
    pub kind: ViolationKind,
}

impl Violation {
    /// Create a violation with an explicit message and kind
    pub fn new(
        key: impl Into<String>,
        parent: impl Into<String>,
        message: impl Into<String>,
        kind: ViolationKind,
    ) -> Self {
        Self {
            key: key.into(),
            parent: parent.into(),
            message: message.into(),
            kind,
        }
    }

    /// Violation for a missing required key
    pub fn required(key: impl Into<String>, parent: impl Into<String>) -> Self {
        let key = key.into();
        let message = format!("{} is missing", key);
        Self::new(key, parent, message, ViolationKind::Required)
    }

    /// Violation for data that does not match the expected type
    pub fn type_mismatch(
        key: impl Into<String>,
        parent: impl Into<String>,
        expected: impl fmt::Display,
    ) -> Self {
        let key = key.into();
        let message = format!("{} should be of type {}", key, expected);
        Self::new(key, parent, message, ViolationKind::Type)
    }

    /// Violation for non-map data where a ruleset was expected
    pub fn ruleset_mismatch(key: impl Into<String>, parent: impl Into<String>) -> Self {
        let key = key.into();
        let message = format!("{} should be a ruleset", key);
        Self::new(key, parent, message, ViolationKind::Type)
    }

    /// Violation for a scalar that is not part of an enum
    pub fn enum_mismatch(
        key: impl Into<String>,
        parent: impl Into<String>,
        enum_name: &str,
    ) -> Self {
        let key = key.into();
        let message = format!("{} does not match any value in enum {}", key, enum_name);
        Self::new(key, parent, message, ViolationKind::Type)
    }

    /// Violation for a string that does not match a pattern
    pub fn regex_mismatch(
        key: impl Into<String>,
        parent: impl Into<String>,
        data: &str,
        pattern: &str,
    ) -> Self {
        let message = format!("{} does not match regex \"{}\"", data, pattern);
        Self::new(key, parent, message, ViolationKind::Type)
    }

    /// Violation for a key a strict ruleset does not declare
    pub fn unexpected_field(key: impl Into<String>, parent: impl Into<String>) -> Self {
        let key = key.into();
        let message = format!("{} is not an expected field", key);
        Self::new(key, parent, message, ViolationKind::Strict)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.parent, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_message() {
        let violation = Violation::required("message", "-");
        assert_eq!(violation.message, "message is missing");
        assert_eq!(violation.kind, ViolationKind::Required);
        assert_eq!(violation.parent, "-");
    }

    #[test]
    fn test_type_mismatch_message() {
        let violation = Violation::type_mismatch("number", "main", "int");
        assert_eq!(violation.message, "number should be of type int");
        assert_eq!(violation.kind, ViolationKind::Type);
    }

    #[test]
    fn test_ruleset_mismatch_message() {
        let violation = Violation::ruleset_mismatch("person", "main");
        assert_eq!(violation.message, "person should be a ruleset");
        assert_eq!(violation.kind, ViolationKind::Type);
    }

    #[test]
    fn test_enum_mismatch_message() {
        let violation = Violation::enum_mismatch("level", "logs", "Level");
        assert_eq!(violation.message, "level does not match any value in enum Level");
    }

    #[test]
    fn test_regex_mismatch_carries_data_and_pattern() {
        let violation = Violation::regex_mismatch("id", "main", "abc", "^[0-9]+$");
        assert_eq!(violation.message, "abc does not match regex \"^[0-9]+$\"");
        assert_eq!(violation.kind, ViolationKind::Type);
    }

    #[test]
    fn test_unexpected_field_message() {
        let violation = Violation::unexpected_field("extra", "main");
        assert_eq!(violation.message, "extra is not an expected field");
        assert_eq!(violation.kind, ViolationKind::Strict);
    }

    #[test]
    fn test_serialized_shape() {
        let violation = Violation::required("message", "main");
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["key"], "message");
        assert_eq!(json["parent"], "main");
        assert_eq!(json["violation_type"], "required");
    }
}
