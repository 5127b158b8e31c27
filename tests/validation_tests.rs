//! End-to-end validation tests
//!
//! Each test resolves a schema from source text or a fixture file and
//! validates YAML documents against it, checking the exact violations
//! that come back.

use std::path::PathBuf;

use yamlator::{load_yaml_file, Violation, ViolationKind, YamlatorSchema};

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn schema(source: &str) -> YamlatorSchema {
    YamlatorSchema::from_string(source).expect("schema should resolve")
}

fn yaml(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(text).expect("data should parse")
}

fn messages(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.message.as_str()).collect()
}

// ============================================================================
// Flat schemas
// ============================================================================

#[test]
fn test_flat_schema_type_violations() {
    let schema = schema("schema {\n    message str required\n    number int\n}");
    let violations = schema.validate(&yaml("message: 12\nnumber: []"));

    assert_eq!(violations.len(), 2);
    assert_eq!(
        messages(&violations),
        vec![
            "message should be of type str",
            "number should be of type int",
        ]
    );
    assert!(violations.iter().all(|v| v.kind == ViolationKind::Type));
}

#[test]
fn test_flat_schema_required_violation() {
    let schema = schema("schema {\n    message str required\n    number int\n}");
    let violations = schema.validate(&yaml("number: 2"));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "message is missing");
    assert_eq!(violations[0].kind, ViolationKind::Required);
}

#[test]
fn test_flat_schema_valid_document() {
    let schema = schema("schema {\n    message str required\n    number int\n}");
    assert!(schema.is_valid(&yaml("message: hello")));
}

// ============================================================================
// Nested structures
// ============================================================================

#[test]
fn test_list_of_rulesets() {
    let schema = schema(
        "schema {\n    personList list(Person) required\n}\n\nruleset Person {\n    name str required\n    age int\n}",
    );
    let violations = schema.validate(&yaml(
        "personList:\n  - name: 0\n  - age: 2",
    ));

    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].message, "name should be of type str");
    assert_eq!(violations[0].parent, "personList[0]");
    assert_eq!(violations[1].message, "name is missing");
    assert_eq!(violations[1].parent, "personList[1]");
}

#[test]
fn test_map_of_rulesets() {
    let schema = schema(
        "schema {\n    servers map(Server) required\n}\n\nruleset Server {\n    host str required\n    port int required\n}",
    );
    let violations = schema.validate(&yaml(
        "servers:\n  alpha:\n    host: a.example.com\n    port: 8080\n  beta:\n    host: b.example.com",
    ));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "port is missing");
    assert_eq!(violations[0].parent, "beta");
}

#[test]
fn test_deeply_nested_containers() {
    let schema = schema("schema {\n    grid list(list(int)) required\n}");
    let violations = schema.validate(&yaml("grid:\n  - [1, 2]\n  - [3, oops]"));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].key, "grid[1][1]");
    assert_eq!(violations[0].message, "grid[1][1] should be of type int");
}

#[test]
fn test_nested_ruleset_chain() {
    let schema = schema(
        "schema {\n    person Person required\n}\n\nruleset Person {\n    name str required\n    address Address required\n}\n\nruleset Address {\n    city str required\n}",
    );
    let violations = schema.validate(&yaml("person:\n  name: ada\n  address:\n    city: 9"));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "city should be of type str");
    assert_eq!(violations[0].parent, "address");
}

// ============================================================================
// Enums, regexes, unions
// ============================================================================

#[test]
fn test_enum_field() {
    let schema = schema(
        "schema {\n    level Level required\n}\n\nenum Level {\n    INFO = \"info\"\n    ERROR = \"error\"\n}",
    );

    assert!(schema.is_valid(&yaml("level: info")));

    let violations = schema.validate(&yaml("level: debug"));
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message,
        "level does not match any value in enum Level"
    );

    // Non-scalar data is a single mismatch, not a crash
    let violations = schema.validate(&yaml("level: [info]"));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::Type);
}

#[test]
fn test_numeric_enum_values() {
    let schema = schema(
        "schema {\n    code Code required\n}\n\nenum Code {\n    OK = 0\n    HALF = 0.5\n}",
    );

    assert!(schema.is_valid(&yaml("code: 0")));
    assert!(schema.is_valid(&yaml("code: 0.5")));
    assert!(!schema.is_valid(&yaml("code: 1")));
}

#[test]
fn test_regex_field() {
    let schema = schema("schema {\n    version regex(\"^v[0-9]+\") required\n}");

    assert!(schema.is_valid(&yaml("version: v12")));

    let violations = schema.validate(&yaml("version: twelve"));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "twelve does not match regex \"^v[0-9]+\"");
}

#[test]
fn test_union_field() {
    let schema = schema("schema {\n    id int|str required\n}");

    assert!(schema.is_valid(&yaml("id: 42")));
    assert!(schema.is_valid(&yaml("id: ab-42")));

    let violations = schema.validate(&yaml("id: [1]"));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "id should be of type union(int, str)");
}

#[test]
fn test_union_inside_list() {
    let schema = schema("schema {\n    mixed list(int|str) required\n}");

    assert!(schema.is_valid(&yaml("mixed:\n  - 1\n  - two\n  - 3")));

    let violations = schema.validate(&yaml("mixed:\n  - 1\n  - true"));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].key, "mixed[1]");
}

// ============================================================================
// Strict mode
// ============================================================================

#[test]
fn test_strict_entry_point() {
    let schema = schema("strict schema {\n    firstName str required\n    lastName str required\n}");
    let violations = schema.validate(&yaml("firstName: a\nlastName: b\nextra: c"));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::Strict);
    assert_eq!(violations[0].key, "extra");
    assert_eq!(violations[0].parent, "-");
    assert_eq!(violations[0].message, "extra is not an expected field");
}

#[test]
fn test_non_strict_entry_point_ignores_extras() {
    let schema = schema("schema {\n    firstName str required\n    lastName str required\n}");
    assert!(schema.is_valid(&yaml("firstName: a\nlastName: b\nextra: c")));
}

#[test]
fn test_nested_strict_ruleset() {
    let schema = schema(
        "schema {\n    person Person required\n}\n\nstrict ruleset Person {\n    name str required\n}",
    );
    let violations = schema.validate(&yaml("person:\n  name: ada\n  nickname: al"));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].key, "nickname");
    assert_eq!(violations[0].parent, "person");
    assert_eq!(violations[0].kind, ViolationKind::Strict);
}

// ============================================================================
// Inheritance and keyless rulesets
// ============================================================================

#[test]
fn test_inherited_rules_are_enforced() {
    let schema = schema(
        "schema {\n    employee Employee required\n}\n\nruleset Entity {\n    id int required\n}\n\nruleset Employee(Entity) {\n    name str required\n}",
    );
    let violations = schema.validate(&yaml("employee:\n  name: ada"));

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "id is missing");
}

#[test]
fn test_child_override_relaxes_parent_type() {
    let schema = schema(
        "schema {\n    record Record required\n}\n\nruleset Base {\n    value int required\n}\n\nruleset Record(Base) {\n    value str required\n}",
    );

    assert!(schema.is_valid(&yaml("record:\n  value: hello")));
    assert!(!schema.is_valid(&yaml("record:\n  value: 5")));
}

#[test]
fn test_keyless_ruleset_for_bare_list_documents() {
    let schema = schema(
        "schema {\n    !!yamlator list(Entry) required\n}\n\nruleset Entry {\n    name str required\n}",
    );

    assert!(schema.is_valid(&yaml("- name: one\n- name: two")));

    let violations = schema.validate(&yaml("- name: one\n- title: two"));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "name is missing");
    assert_eq!(violations[0].parent, "main[1]");
}

// ============================================================================
// Fixture files
// ============================================================================

#[test]
fn test_fixture_schema_accepts_valid_document() {
    let schema = YamlatorSchema::from_file(fixtures_dir().join("person.ys"))
        .expect("fixture schema should resolve");
    let data = load_yaml_file(&fixtures_dir().join("person_valid.yaml"))
        .expect("fixture data should load");

    let violations = schema.validate(&data);
    assert!(violations.is_empty(), "unexpected: {:?}", violations);
}

#[test]
fn test_fixture_schema_reports_violations() {
    let schema = YamlatorSchema::from_file(fixtures_dir().join("person.ys"))
        .expect("fixture schema should resolve");
    let data = load_yaml_file(&fixtures_dir().join("person_invalid.yaml"))
        .expect("fixture data should load");

    let violations = schema.validate(&data);
    let got = messages(&violations);

    assert_eq!(violations.len(), 4, "got: {:?}", got);
    assert!(got.contains(&"firstName is missing"));
    assert!(got.contains(&"lastName should be of type str"));
    assert!(got.contains(&"role does not match any value in enum Role"));
    assert!(got.contains(&"line1 is missing"));
}
