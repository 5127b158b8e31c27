//! Validation context
//!
//! Carries the resolved lookup tables and the violation buffer for one
//! validation run. Each run owns its own context; nothing is shared
//! between runs.

use indexmap::IndexMap;

use crate::types::{YamlatorEnum, YamlatorRuleset};
use crate::violations::Violation;

/// State for a single validation run
#[derive(Debug)]
pub struct ValidationContext<'schema> {
    rulesets: &'schema IndexMap<String, YamlatorRuleset>,
    enums: &'schema IndexMap<String, YamlatorEnum>,
    violations: Vec<Violation>,
}

impl<'schema> ValidationContext<'schema> {
    /// Create a context over resolved lookup tables
    pub fn new(
        rulesets: &'schema IndexMap<String, YamlatorRuleset>,
        enums: &'schema IndexMap<String, YamlatorEnum>,
    ) -> Self {
        Self {
            rulesets,
            enums,
            violations: Vec::new(),
        }
    }

    /// Look up a ruleset by its registered name
    pub fn lookup_ruleset(&self, name: &str) -> Option<&'schema YamlatorRuleset> {
        self.rulesets.get(name)
    }

    /// Look up an enum by its registered name
    pub fn lookup_enum(&self, name: &str) -> Option<&'schema YamlatorEnum> {
        self.enums.get(name)
    }

    /// Append a violation
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Get the violations collected so far
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Run a probe against an empty buffer and return what it collected
    ///
    /// Violations collected before the probe are untouched.
    pub fn capture<F>(&mut self, probe: F) -> Vec<Violation>
    where
        F: FnOnce(&mut Self),
    {
        let saved = std::mem::take(&mut self.violations);
        probe(self);
        std::mem::replace(&mut self.violations, saved)
    }

    /// Consume the context, yielding the collected violations
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
