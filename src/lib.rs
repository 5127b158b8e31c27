//! # yamlator
//!
//! A schema language and validation engine for YAML documents.
//!
//! Schemas are written in `.ys` files as rulesets, enums and a root
//! `schema` block. A schema file is loaded and resolved once, then any
//! number of YAML documents can be validated against it; validation
//! reports a list of violations instead of failing on the first
//! problem.
//!
//! ## Features
//!
//! - Rulesets with required/optional fields and single inheritance
//! - Built-in types, containers (`list`, `map`), regexes, enums, unions
//! - Strict rulesets that reject undeclared fields
//! - Cross-file `import` with namespacing and cycle detection
//! - Keyless schemas for documents whose root is a bare list or scalar
//!
//! ## Example
//!
//! ```rust,ignore
//! use yamlator::YamlatorSchema;
//!
//! // Load and resolve a schema
//! let schema = YamlatorSchema::from_file("path/to/schema.ys")?;
//!
//! // Validate a YAML document
//! let data = yamlator::load_yaml_file("path/to/data.yaml".as_ref())?;
//! for violation in schema.validate(&data) {
//!     println!("{}", violation);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;

pub mod types;
pub mod violations;

pub mod grammar;

pub mod dependencies;
pub mod loaders;
pub mod resolver;

pub mod validators;

// Re-exports for convenience
pub use error::{Error, Result, SyntaxError, SyntaxErrorKind};
pub use grammar::parse_schema;
pub use loaders::{load_schema, load_yaml_file, SCHEMA_EXTENSION};
pub use resolver::resolve_schema;
pub use types::{
    EnumItem, ImportedType, PartiallyLoadedSchema, Rule, RuleType, SchemaType, YamlatorEnum,
    YamlatorRuleset, YamlatorSchema, KEYLESS_RULE_DIRECTIVE, ROOT_RULESET_NAME,
};
pub use validators::{validate, ValidationContext, ROOT_PARENT_KEY};
pub use violations::{Violation, ViolationKind};

/// Version of the yamlator library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
