//! Container validation
//!
//! Map and list stages. Containers never settle anything themselves;
//! every child value re-enters the dispatch under its own key.

use serde_yaml::Value;

use crate::types::{RuleType, SchemaType};
use crate::violations::Violation;

use super::context::ValidationContext;
use super::dispatch;

/// Validate map-shaped data with a single value type
pub(super) fn validate_map(
    key: &str,
    parent: &str,
    value: &Value,
    value_type: &RuleType,
    context: &mut ValidationContext<'_>,
) {
    let mapping = match value.as_mapping() {
        Some(mapping) => mapping,
        None => {
            context.push(Violation::type_mismatch(key, parent, SchemaType::Map));
            return;
        }
    };

    for (child_key, child_value) in mapping {
        let label = key_label(child_key);
        dispatch::validate_present(&label, key, child_value, value_type, context);
    }
}

/// Validate list-shaped data with a single element type
pub(super) fn validate_list(
    key: &str,
    parent: &str,
    value: &Value,
    element_type: &RuleType,
    context: &mut ValidationContext<'_>,
) {
    let sequence = match value.as_sequence() {
        Some(sequence) => sequence,
        None => {
            context.push(Violation::type_mismatch(key, parent, SchemaType::List));
            return;
        }
    };

    for (idx, element) in sequence.iter().enumerate() {
        let element_key = format!("{}[{}]", key, idx);
        dispatch::validate_present(&element_key, key, element, element_type, context);
    }
}

/// Render a mapping key for violation reports
pub(super) fn key_label(key: &Value) -> String {
    if let Some(text) = dispatch::scalar_as_string(key) {
        text
    } else if let Value::Bool(flag) = key {
        flag.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{YamlatorEnum, YamlatorRuleset};
    use indexmap::IndexMap;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn run(rtype: RuleType, data: &Value) -> Vec<Violation> {
        let rulesets: IndexMap<String, YamlatorRuleset> = IndexMap::new();
        let enums: IndexMap<String, YamlatorEnum> = IndexMap::new();
        let mut context = ValidationContext::new(&rulesets, &enums);
        dispatch::validate_present("field", "main", data, &rtype, &mut context);
        context.into_violations()
    }

    #[test]
    fn test_map_rejects_non_map_data() {
        let value = yaml("5");
        let violations = run(RuleType::Map(Box::new(RuleType::Int)), &value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "field should be of type map");
    }

    #[test]
    fn test_map_children_carry_their_own_keys() {
        let value = yaml("a: 1\nb: two\nc: 3");
        let violations = run(RuleType::Map(Box::new(RuleType::Int)), &value);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "b");
        assert_eq!(violations[0].parent, "field");
        assert_eq!(violations[0].message, "b should be of type int");
    }

    #[test]
    fn test_nested_map_recursion() {
        let value = yaml("outer:\n  inner: oops");
        let rtype = RuleType::Map(Box::new(RuleType::Map(Box::new(RuleType::Int))));
        let violations = run(rtype, &value);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "inner");
        assert_eq!(violations[0].parent, "outer");
    }

    #[test]
    fn test_list_rejects_non_list_data() {
        let value = yaml("a: 1");
        let violations = run(RuleType::List(Box::new(RuleType::Int)), &value);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "field should be of type list");
    }

    #[test]
    fn test_list_elements_are_indexed() {
        let value = yaml("- 1\n- two\n- 3");
        let violations = run(RuleType::List(Box::new(RuleType::Int)), &value);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "field[1]");
        assert_eq!(violations[0].parent, "field");
        assert_eq!(violations[0].message, "field[1] should be of type int");
    }

    #[test]
    fn test_nested_list_indexing() {
        let value = yaml("- [1, 2]\n- [3, bad]");
        let rtype = RuleType::List(Box::new(RuleType::List(Box::new(RuleType::Int))));
        let violations = run(rtype, &value);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "field[1][1]");
        assert_eq!(violations[0].parent, "field[1]");
    }

    #[test]
    fn test_null_element_fails_scalar_check() {
        let value = yaml("- 1\n- null\n- 3");
        let violations = run(RuleType::List(Box::new(RuleType::Int)), &value);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].key, "field[1]");
    }

    #[test]
    fn test_key_label_canonicalizes_scalars() {
        assert_eq!(key_label(&yaml("name")), "name");
        assert_eq!(key_label(&yaml("5")), "5");
        assert_eq!(key_label(&yaml("true")), "true");
        assert_eq!(key_label(&yaml("[1]")), "");
    }
}
