//! Schema text parsing
//!
//! Turns schema source into a [`PartiallyLoadedSchema`] in two phases:
//! the lexer and parser build every construct with references left as
//! `RuleType::Unresolved`, then the references are classified against
//! the complete set of names declared in the file. Declaration order
//! never matters; names not declared in the file stay unresolved for
//! cross-file resolution.

pub mod lexer;
mod parser;

use std::collections::HashMap;

use crate::error::Result;
use crate::types::{PartiallyLoadedSchema, RuleType, YamlatorRuleset, ROOT_RULESET_NAME};

use parser::{ParsedFile, Parser};

/// Kind of a construct declared in the current file
enum ConstructKind {
    Ruleset,
    Enum,
}

/// Parse schema source into its partially loaded form
///
/// Empty input is valid and produces a schema with an empty `main`
/// ruleset. A later `schema` block replaces an earlier one.
pub fn parse_schema(source: &str) -> Result<PartiallyLoadedSchema> {
    let tokens = lexer::tokenize(source)?;
    let parsed = Parser::new(tokens, source).parse()?;
    Ok(classify_references(parsed))
}

/// Rewrite references to constructs declared in this file
fn classify_references(parsed: ParsedFile) -> PartiallyLoadedSchema {
    let ParsedFile {
        mut rulesets,
        enums,
        imports,
    } = parsed;

    let root = rulesets
        .shift_remove(ROOT_RULESET_NAME)
        .unwrap_or_else(|| YamlatorRuleset::new(ROOT_RULESET_NAME, Vec::new()));

    // Rulesets shadow enums with the same name, matching lookup order
    let mut kinds: HashMap<String, ConstructKind> = HashMap::new();
    for name in rulesets.keys() {
        kinds.insert(name.clone(), ConstructKind::Ruleset);
    }
    for name in enums.keys() {
        kinds
            .entry(name.clone())
            .or_insert(ConstructKind::Enum);
    }

    let root = classify_ruleset(root, &kinds);
    let rulesets = rulesets
        .into_iter()
        .map(|(name, ruleset)| (name, classify_ruleset(ruleset, &kinds)))
        .collect();

    PartiallyLoadedSchema {
        root,
        rulesets,
        enums,
        imports,
    }
}

fn classify_ruleset(
    mut ruleset: YamlatorRuleset,
    kinds: &HashMap<String, ConstructKind>,
) -> YamlatorRuleset {
    for rule in &mut ruleset.rules {
        let rtype = std::mem::replace(&mut rule.rtype, RuleType::Any);
        rule.rtype = classify_type(rtype, kinds);
    }
    ruleset
}

fn classify_type(rtype: RuleType, kinds: &HashMap<String, ConstructKind>) -> RuleType {
    match rtype {
        RuleType::Unresolved(name) => match kinds.get(&name) {
            Some(ConstructKind::Ruleset) => RuleType::Ruleset(name),
            Some(ConstructKind::Enum) => RuleType::Enum(name),
            None => RuleType::Unresolved(name),
        },
        RuleType::List(inner) => RuleType::List(Box::new(classify_type(*inner, kinds))),
        RuleType::Map(inner) => RuleType::Map(Box::new(classify_type(*inner, kinds))),
        RuleType::Union(members) => RuleType::Union(
            members
                .into_iter()
                .map(|member| classify_type(member, kinds))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KEYLESS_RULE_DIRECTIVE;

    #[test]
    fn test_parse_minimal_schema() {
        let schema = parse_schema(
            "schema {\n    message str required\n    number int\n}",
        )
        .unwrap();

        assert_eq!(schema.root.name, ROOT_RULESET_NAME);
        assert_eq!(schema.root.rules.len(), 2);
        assert!(!schema.root.is_strict);

        let message = &schema.root.rules[0];
        assert_eq!(message.name, "message");
        assert_eq!(message.rtype, RuleType::Str);
        assert!(message.is_required);

        let number = &schema.root.rules[1];
        assert_eq!(number.name, "number");
        assert_eq!(number.rtype, RuleType::Int);
        assert!(!number.is_required);
    }

    #[test]
    fn test_empty_input_is_an_empty_root() {
        let schema = parse_schema("").unwrap();
        assert_eq!(schema.root.name, ROOT_RULESET_NAME);
        assert!(schema.root.rules.is_empty());
        assert!(schema.rulesets.is_empty());
        assert!(schema.enums.is_empty());
        assert!(schema.imports.is_empty());
    }

    #[test]
    fn test_forward_reference_resolves_in_file() {
        let schema = parse_schema(
            "schema {\n    person Person required\n}\n\nruleset Person {\n    name str required\n}",
        )
        .unwrap();

        assert_eq!(
            schema.root.rules[0].rtype,
            RuleType::Ruleset("Person".to_string())
        );
        assert!(schema.unresolved_lookups().is_empty());
    }

    #[test]
    fn test_enum_reference_classification() {
        let schema = parse_schema(
            "enum Level {\n    INFO = \"info\"\n    ERR = \"error\"\n}\n\nschema {\n    level Level required\n}",
        )
        .unwrap();

        assert_eq!(
            schema.root.rules[0].rtype,
            RuleType::Enum("Level".to_string())
        );
        assert!(schema.enums.get("Level").unwrap().matches("error"));
    }

    #[test]
    fn test_unknown_reference_stays_unresolved() {
        let schema = parse_schema("schema {\n    person common.Person required\n}").unwrap();
        assert_eq!(
            schema.root.rules[0].rtype,
            RuleType::Unresolved("common.Person".to_string())
        );
        assert_eq!(schema.unresolved_lookups(), vec!["common.Person"]);
    }

    #[test]
    fn test_references_inside_containers_are_classified() {
        let schema = parse_schema(
            "ruleset Person {\n    name str required\n}\n\nschema {\n    people list(Person) required\n    teams map(list(Person))\n}",
        )
        .unwrap();

        assert_eq!(
            schema.root.rules[0].rtype,
            RuleType::List(Box::new(RuleType::Ruleset("Person".to_string())))
        );
        assert_eq!(
            schema.root.rules[1].rtype,
            RuleType::Map(Box::new(RuleType::List(Box::new(RuleType::Ruleset(
                "Person".to_string()
            )))))
        );
    }

    #[test]
    fn test_strict_blocks_and_inheritance() {
        let schema = parse_schema(
            "strict schema {\n    user User required\n}\n\nstrict ruleset User(Base) {\n    name str\n}\n\nruleset Base {\n    id int required\n}",
        )
        .unwrap();

        assert!(schema.root.is_strict);
        let user = schema.rulesets.get("User").unwrap();
        assert!(user.is_strict);
        assert_eq!(user.parent.as_deref(), Some("Base"));
        assert!(schema.rulesets.get("Base").unwrap().parent.is_none());
    }

    #[test]
    fn test_keyless_directive_rule() {
        let schema = parse_schema(
            "schema {\n    items Items required\n}\n\nruleset Items {\n    !!yamlator list(int)\n}",
        )
        .unwrap();

        let items = schema.rulesets.get("Items").unwrap();
        let keyless = items.keyless_rule().unwrap();
        assert_eq!(keyless.name, KEYLESS_RULE_DIRECTIVE);
        assert_eq!(keyless.rtype, RuleType::List(Box::new(RuleType::Int)));
    }

    #[test]
    fn test_quoted_and_keyword_rule_names() {
        let schema = parse_schema(
            "schema {\n    'first name' str\n    map map(int)\n    from str\n}",
        )
        .unwrap();

        let names: Vec<&str> = schema
            .root
            .rules
            .iter()
            .map(|rule| rule.name.as_str())
            .collect();
        assert_eq!(names, vec!["first name", "map", "from"]);
    }

    #[test]
    fn test_enum_numeric_values_are_canonicalized() {
        let schema = parse_schema(
            "enum Mixed {\n    ONE = 1\n    HALF = 0.5\n    COLD = -2.5\n    NAME = \"one\"\n}",
        )
        .unwrap();

        let mixed = schema.enums.get("Mixed").unwrap();
        assert!(mixed.matches("1"));
        assert!(mixed.matches("0.5"));
        assert!(mixed.matches("-2.5"));
        assert!(mixed.matches("one"));
        assert!(!mixed.matches("ONE"));
    }

    #[test]
    fn test_later_schema_block_replaces_earlier() {
        let schema = parse_schema(
            "schema {\n    a int\n}\n\nschema {\n    b str required\n}",
        )
        .unwrap();

        assert_eq!(schema.root.rules.len(), 1);
        assert_eq!(schema.root.rules[0].name, "b");
    }

    #[test]
    fn test_import_statements_collected_in_order() {
        let schema = parse_schema(
            "import {Person, Address} from \"common/base.ys\"\nimport {Status} from \"core.ys\" as core\n\nschema {\n    person Person required\n}",
        )
        .unwrap();

        assert_eq!(schema.imports.len(), 3);
        assert_eq!(schema.imports[0].item, "Person");
        assert_eq!(schema.imports[0].source_path, "common/base.ys");
        assert_eq!(schema.imports[0].namespace, None);
        assert_eq!(schema.imports[1].item, "Address");
        assert_eq!(schema.imports[2].qualified_name(), "core.Status");

        // Imported names are not declared here, so they stay unresolved
        assert_eq!(schema.unresolved_lookups(), vec!["Person"]);
    }

    #[test]
    fn test_ruleset_shadows_enum_with_same_name() {
        let schema = parse_schema(
            "ruleset Value {\n    v int\n}\n\nenum Value {\n    A = \"a\"\n}\n\nschema {\n    value Value\n}",
        )
        .unwrap();

        assert_eq!(
            schema.root.rules[0].rtype,
            RuleType::Ruleset("Value".to_string())
        );
    }
}
