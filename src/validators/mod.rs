//! YAML validation engine
//!
//! Walks a YAML document depth-first against a resolved schema,
//! appending a violation for every rule the data breaks. Validation is
//! total: it never fails, it only reports.

mod containers;
mod context;
mod dispatch;
mod references;
mod unions;

pub use context::ValidationContext;

use serde_yaml::Value;

use crate::types::YamlatorSchema;
use crate::violations::Violation;

/// Parent key reported for violations on root-level fields
pub const ROOT_PARENT_KEY: &str = "-";

/// Validate a YAML document against a resolved schema
///
/// The document is validated as the root ruleset; violations come back
/// in traversal order.
pub fn validate(schema: &YamlatorSchema, data: &Value) -> Vec<Violation> {
    let mut context = ValidationContext::new(&schema.rulesets, &schema.enums);
    references::validate_entry(data, &schema.root, &mut context);
    context.into_violations()
}

impl YamlatorSchema {
    /// Validate a YAML document, collecting every violation
    pub fn validate(&self, data: &Value) -> Vec<Violation> {
        validate(self, data)
    }

    /// Check whether a YAML document satisfies this schema
    pub fn is_valid(&self, data: &Value) -> bool {
        self.validate(data).is_empty()
    }
}
