//! Reference validation
//!
//! Ruleset, enum and regex stages. Ruleset validation is the recursive
//! re-entry point of the walk: every declared rule extracts its
//! sub-field from the data and goes back through the full dispatch.

use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::types::{SchemaType, YamlatorRuleset, ROOT_RULESET_NAME};
use crate::violations::Violation;

use super::containers;
use super::context::ValidationContext;
use super::dispatch;
use super::ROOT_PARENT_KEY;

/// Validate the document root against the entry ruleset
///
/// The root validates as the ruleset `main`, but its rules and strict
/// checks report the root parent key rather than `main`, so top-level
/// violations read the same way the document does.
pub(super) fn validate_entry(
    value: &Value,
    root: &YamlatorRuleset,
    context: &mut ValidationContext<'_>,
) {
    validate_ruleset_value(
        ROOT_RULESET_NAME,
        ROOT_PARENT_KEY,
        ROOT_PARENT_KEY,
        value,
        root,
        context,
    );
}

/// Validate data against a named ruleset
///
/// An unknown name degrades to an empty ruleset so validation stays
/// total.
pub(super) fn validate_ruleset(
    key: &str,
    parent: &str,
    value: &Value,
    name: &str,
    context: &mut ValidationContext<'_>,
) {
    match context.lookup_ruleset(name) {
        Some(ruleset) => validate_ruleset_value(key, parent, key, value, ruleset, context),
        None => {
            let empty = YamlatorRuleset::new(name, Vec::new());
            validate_ruleset_value(key, parent, key, value, &empty, context);
        }
    }
}

/// Validate data against a ruleset's rules
///
/// Rule and strict violations are reported under `rules_parent`: the
/// ruleset's own data key for nested rulesets, the root parent key for
/// the entry. A keyless ruleset validates the whole value against its
/// directive rule; the other rules are ignored. In a strict ruleset,
/// undeclared data keys are reported before any rule checks, in
/// document order.
fn validate_ruleset_value(
    key: &str,
    parent: &str,
    rules_parent: &str,
    value: &Value,
    ruleset: &YamlatorRuleset,
    context: &mut ValidationContext<'_>,
) {
    let value = dispatch::untag(value);

    if let Some(keyless) = ruleset.keyless_rule() {
        dispatch::validate_value(
            key,
            parent,
            Some(value),
            &keyless.rtype,
            keyless.is_required,
            context,
        );
        return;
    }

    let mapping = match value.as_mapping() {
        Some(mapping) => mapping,
        None => {
            context.push(Violation::ruleset_mismatch(key, parent));
            return;
        }
    };

    if ruleset.is_strict {
        for (data_key, _) in mapping {
            let label = containers::key_label(data_key);
            if !ruleset.rules.iter().any(|rule| rule.name == label) {
                context.push(Violation::unexpected_field(label, rules_parent));
            }
        }
    }

    for rule in &ruleset.rules {
        let sub_data = rule_value(mapping, &rule.name);
        dispatch::validate_value(
            &rule.name,
            rules_parent,
            sub_data,
            &rule.rtype,
            rule.is_required,
            context,
        );
    }
}

/// Extract the data for a rule, matching keys by their canonical label
///
/// Uses the same canonicalization as the strict check, so a numeric
/// data key that counts as declared is also the key that gets
/// validated.
fn rule_value<'v>(mapping: &'v Mapping, name: &str) -> Option<&'v Value> {
    mapping
        .iter()
        .find_map(|(data_key, sub_data)| (containers::key_label(data_key) == name).then_some(sub_data))
}

/// Validate a scalar against a named enum
///
/// Strings and numbers match by canonical string form. Any other data
/// shape, an unknown value, or an unknown enum name is a mismatch.
pub(super) fn validate_enum(
    key: &str,
    parent: &str,
    value: &Value,
    name: &str,
    context: &mut ValidationContext<'_>,
) {
    let matched = match (dispatch::scalar_as_string(value), context.lookup_enum(name)) {
        (Some(text), Some(target)) => target.matches(&text),
        _ => false,
    };

    if !matched {
        context.push(Violation::enum_mismatch(key, parent, name));
    }
}

/// Validate a string against a compiled pattern
pub(super) fn validate_regex(
    key: &str,
    parent: &str,
    value: &Value,
    pattern: &Regex,
    context: &mut ValidationContext<'_>,
) {
    let text = match value.as_str() {
        Some(text) => text,
        None => {
            context.push(Violation::type_mismatch(key, parent, SchemaType::Str));
            return;
        }
    };

    if !pattern.is_match(text) {
        context.push(Violation::regex_mismatch(key, parent, text, pattern.as_str()));
    }
}
