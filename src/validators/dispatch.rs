//! Type dispatch
//!
//! The single recursive entry point of the validation walk. Every rule
//! and every nested value funnels through [`validate_value`], which
//! settles absence first and then hands present data to the stage
//! matching the rule type.

use serde_yaml::Value;

use crate::types::RuleType;
use crate::violations::Violation;

use super::containers;
use super::context::ValidationContext;
use super::references;
use super::unions;

/// Validate one data slot against a rule type
///
/// Absent data is a missing key or an explicit null. Required rules
/// report it; optional rules accept it silently.
pub(super) fn validate_value(
    key: &str,
    parent: &str,
    data: Option<&Value>,
    rtype: &RuleType,
    is_required: bool,
    context: &mut ValidationContext<'_>,
) {
    let value = match data.map(untag) {
        Some(value) if !value.is_null() => value,
        _ => {
            if is_required {
                context.push(Violation::required(key, parent));
            }
            return;
        }
    };

    validate_present(key, parent, value, rtype, context);
}

/// Validate data that is known to be present
pub(super) fn validate_present(
    key: &str,
    parent: &str,
    value: &Value,
    rtype: &RuleType,
    context: &mut ValidationContext<'_>,
) {
    let value = untag(value);
    match rtype {
        RuleType::Str | RuleType::Int | RuleType::Float | RuleType::Bool => {
            if !matches_builtin(value, rtype) {
                context.push(Violation::type_mismatch(key, parent, rtype.kind()));
            }
        }
        RuleType::Any => {}
        RuleType::List(element) => containers::validate_list(key, parent, value, element, context),
        RuleType::Map(element) => containers::validate_map(key, parent, value, element, context),
        RuleType::Ruleset(name) => references::validate_ruleset(key, parent, value, name, context),
        RuleType::Enum(name) => references::validate_enum(key, parent, value, name, context),
        RuleType::Regex(pattern) => {
            references::validate_regex(key, parent, value, pattern, context)
        }
        RuleType::Union(members) => {
            unions::validate_union(key, parent, value, rtype, members, context)
        }
        // References that survive resolution are accepted
        RuleType::Unresolved(_) => {}
    }
}

/// Check a scalar against a built-in type without coercion
///
/// Integers are not floats and booleans are not integers.
fn matches_builtin(value: &Value, rtype: &RuleType) -> bool {
    match rtype {
        RuleType::Str => value.is_string(),
        RuleType::Int => {
            matches!(value, Value::Number(number) if number.is_i64() || number.is_u64())
        }
        RuleType::Float => matches!(value, Value::Number(number) if number.is_f64()),
        RuleType::Bool => matches!(value, Value::Bool(_)),
        _ => false,
    }
}

/// Get the canonical string form of a string or number scalar
pub(super) fn scalar_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(int.to_string())
            } else if let Some(int) = number.as_u64() {
                Some(int.to_string())
            } else {
                number.as_f64().map(|float| float.to_string())
            }
        }
        _ => None,
    }
}

/// Strip YAML tags, which carry no meaning for validation
pub(super) fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}
