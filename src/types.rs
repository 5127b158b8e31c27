//! Schema object model
//!
//! This module defines the typed representation of a parsed schema:
//! rule types, rules, rulesets, enums, import statements and the
//! partially-loaded and fully-resolved schema containers.

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{Error, Result};

/// Name of the root ruleset produced by a `schema` block
pub const ROOT_RULESET_NAME: &str = "main";

/// Rule name marking a ruleset whose data is a bare list or scalar
/// rather than a keyed map
pub const KEYLESS_RULE_DIRECTIVE: &str = "!!yamlator";

/// The closed set of type kinds a rule can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// String scalar
    Str,
    /// Integer scalar
    Int,
    /// Float scalar
    Float,
    /// Boolean scalar
    Bool,
    /// Map with a single value type
    Map,
    /// List with a single element type
    List,
    /// Reference to a declared enum
    Enum,
    /// Reference to a declared ruleset
    Ruleset,
    /// Wildcard accepting anything
    Any,
    /// Regular expression over string scalars
    Regex,
    /// Ordered set of candidate types
    Union,
    /// Reference whose target is not resolved yet
    Unknown,
}

impl SchemaType {
    /// Get the lowercase name of the type kind
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Str => "str",
            SchemaType::Int => "int",
            SchemaType::Float => "float",
            SchemaType::Bool => "bool",
            SchemaType::Map => "map",
            SchemaType::List => "list",
            SchemaType::Enum => "enum",
            SchemaType::Ruleset => "ruleset",
            SchemaType::Any => "any",
            SchemaType::Regex => "regex",
            SchemaType::Union => "union",
            SchemaType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The type carried by a rule, including any payload
///
/// `Unresolved` holds a reference by name whose target construct is not
/// known yet; resolution rewrites it to `Ruleset` or `Enum`. A schema
/// returned by the resolver contains no `Unresolved` nodes.
#[derive(Debug, Clone)]
pub enum RuleType {
    /// String scalar
    Str,
    /// Integer scalar
    Int,
    /// Float scalar
    Float,
    /// Boolean scalar
    Bool,
    /// Wildcard accepting anything
    Any,
    /// List with the given element type
    List(Box<RuleType>),
    /// Map with the given value type
    Map(Box<RuleType>),
    /// Compiled regular expression matched with search semantics
    Regex(Regex),
    /// Reference to the named ruleset
    Ruleset(String),
    /// Reference to the named enum
    Enum(String),
    /// Candidate types tried in order
    Union(Vec<RuleType>),
    /// Reference to a construct that is not resolved yet
    Unresolved(String),
}

impl RuleType {
    /// Get the kind of this type
    pub fn kind(&self) -> SchemaType {
        match self {
            RuleType::Str => SchemaType::Str,
            RuleType::Int => SchemaType::Int,
            RuleType::Float => SchemaType::Float,
            RuleType::Bool => SchemaType::Bool,
            RuleType::Any => SchemaType::Any,
            RuleType::List(_) => SchemaType::List,
            RuleType::Map(_) => SchemaType::Map,
            RuleType::Regex(_) => SchemaType::Regex,
            RuleType::Ruleset(_) => SchemaType::Ruleset,
            RuleType::Enum(_) => SchemaType::Enum,
            RuleType::Union(_) => SchemaType::Union,
            RuleType::Unresolved(_) => SchemaType::Unknown,
        }
    }

    /// Get the lookup name for reference types
    pub fn lookup(&self) -> Option<&str> {
        match self {
            RuleType::Ruleset(name) | RuleType::Enum(name) | RuleType::Unresolved(name) => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Check whether a union occurs anywhere in this type's subtree
    pub fn contains_union(&self) -> bool {
        match self {
            RuleType::Union(_) => true,
            RuleType::List(inner) | RuleType::Map(inner) => inner.contains_union(),
            _ => false,
        }
    }

    /// Collect unresolved lookup names in first-seen order
    fn collect_unresolved(&self, out: &mut Vec<String>) {
        match self {
            RuleType::Unresolved(name) => {
                if !out.iter().any(|seen| seen == name) {
                    out.push(name.clone());
                }
            }
            RuleType::List(inner) | RuleType::Map(inner) => inner.collect_unresolved(out),
            RuleType::Union(types) => {
                for sub in types {
                    sub.collect_unresolved(out);
                }
            }
            _ => {}
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleType::Str => write!(f, "str"),
            RuleType::Int => write!(f, "int"),
            RuleType::Float => write!(f, "float"),
            RuleType::Bool => write!(f, "bool"),
            RuleType::Any => write!(f, "any"),
            RuleType::List(inner) => write!(f, "list({})", inner),
            RuleType::Map(inner) => write!(f, "map({})", inner),
            RuleType::Regex(pattern) => write!(f, "Regex({})", pattern.as_str()),
            RuleType::Ruleset(name) | RuleType::Enum(name) | RuleType::Unresolved(name) => {
                write!(f, "{}", name)
            }
            RuleType::Union(types) => {
                write!(f, "union(")?;
                for (idx, sub) in types.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", sub)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl PartialEq for RuleType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleType::Str, RuleType::Str)
            | (RuleType::Int, RuleType::Int)
            | (RuleType::Float, RuleType::Float)
            | (RuleType::Bool, RuleType::Bool)
            | (RuleType::Any, RuleType::Any) => true,
            (RuleType::List(a), RuleType::List(b)) => a == b,
            (RuleType::Map(a), RuleType::Map(b)) => a == b,
            // Regexes compare by pattern source
            (RuleType::Regex(a), RuleType::Regex(b)) => a.as_str() == b.as_str(),
            (RuleType::Ruleset(a), RuleType::Ruleset(b)) => a == b,
            (RuleType::Enum(a), RuleType::Enum(b)) => a == b,
            (RuleType::Union(a), RuleType::Union(b)) => a == b,
            (RuleType::Unresolved(a), RuleType::Unresolved(b)) => a == b,
            _ => false,
        }
    }
}

/// A single field rule inside a ruleset
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Data key the rule applies to
    pub name: String,
    /// Type the data under the key must satisfy
    pub rtype: RuleType,
    /// Whether missing data is a violation
    pub is_required: bool,
}

impl Rule {
    /// Create a new rule
    pub fn new(name: impl Into<String>, rtype: RuleType, is_required: bool) -> Self {
        Self {
            name: name.into(),
            rtype,
            is_required,
        }
    }

    /// Check whether this is the keyless directive rule
    pub fn is_keyless(&self) -> bool {
        self.name == KEYLESS_RULE_DIRECTIVE
    }
}

/// A named value inside an enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumItem {
    /// Declared item name
    pub name: String,
    /// Canonical string form of the item value
    pub value: String,
}

impl EnumItem {
    /// Create a new enum item
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named set of literal values
///
/// Items are keyed by value so validation is a single lookup. A value
/// declared twice keeps the later item.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlatorEnum {
    /// Enum name
    pub name: String,
    /// Items keyed by value, in declaration order
    pub items: IndexMap<String, EnumItem>,
}

impl YamlatorEnum {
    /// Create a new empty enum
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: IndexMap::new(),
        }
    }

    /// Add an item, replacing any earlier item with the same value
    pub fn add_item(&mut self, item: EnumItem) {
        self.items.insert(item.value.clone(), item);
    }

    /// Check whether a value belongs to the enum
    pub fn matches(&self, value: &str) -> bool {
        self.items.contains_key(value)
    }
}

/// A named, ordered collection of field rules
#[derive(Debug, Clone, PartialEq)]
pub struct YamlatorRuleset {
    /// Ruleset name
    pub name: String,
    /// Rules in declaration order
    pub rules: Vec<Rule>,
    /// When set, data keys not named by any rule are violations
    pub is_strict: bool,
    /// Lookup name of the parent ruleset, if any
    pub parent: Option<String>,
}

impl YamlatorRuleset {
    /// Create a new non-strict ruleset without a parent
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
            is_strict: false,
            parent: None,
        }
    }

    /// Set the strict flag
    pub fn with_strict(mut self, is_strict: bool) -> Self {
        self.is_strict = is_strict;
        self
    }

    /// Set the parent ruleset lookup name
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Get the keyless directive rule, if the ruleset declares one
    pub fn keyless_rule(&self) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.is_keyless())
    }
}

/// One item requested by an `import` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedType {
    /// Name of the construct to import
    pub item: String,
    /// Schema path the construct comes from, relative to the importer
    pub source_path: String,
    /// Namespace the construct is imported under, if aliased
    pub namespace: Option<String>,
}

impl ImportedType {
    /// Create a new import entry
    ///
    /// Fails with a value error when the item or source path is empty.
    pub fn new(
        item: impl Into<String>,
        source_path: impl Into<String>,
        namespace: Option<String>,
    ) -> Result<Self> {
        let item = item.into();
        let source_path = source_path.into();

        if item.is_empty() {
            return Err(Error::Value("import item must not be empty".to_string()));
        }
        if source_path.is_empty() {
            return Err(Error::Value(
                "import source path must not be empty".to_string(),
            ));
        }

        Ok(Self {
            item,
            source_path,
            namespace,
        })
    }

    /// Get the name the construct is registered under after import
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{}.{}", namespace, self.item),
            None => self.item.clone(),
        }
    }
}

/// A parsed schema file before imports, inheritance and references
/// are resolved
#[derive(Debug, Clone, PartialEq)]
pub struct PartiallyLoadedSchema {
    /// Root ruleset from the `schema` block
    pub root: YamlatorRuleset,
    /// Named rulesets in declaration order
    pub rulesets: IndexMap<String, YamlatorRuleset>,
    /// Named enums in declaration order
    pub enums: IndexMap<String, YamlatorEnum>,
    /// Pending import statements
    pub imports: Vec<ImportedType>,
}

impl PartiallyLoadedSchema {
    /// Collect lookup names that are not declared in this file,
    /// in first-seen order
    pub fn unresolved_lookups(&self) -> Vec<String> {
        let mut names = Vec::new();
        for rule in &self.root.rules {
            rule.rtype.collect_unresolved(&mut names);
        }
        for ruleset in self.rulesets.values() {
            for rule in &ruleset.rules {
                rule.rtype.collect_unresolved(&mut names);
            }
        }
        names
    }
}

/// A fully resolved schema ready for validation
///
/// Immutable after construction and safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct YamlatorSchema {
    /// Root ruleset validation enters through
    pub root: YamlatorRuleset,
    /// Resolved rulesets keyed by (possibly namespaced) name
    pub rulesets: IndexMap<String, YamlatorRuleset>,
    /// Resolved enums keyed by (possibly namespaced) name
    pub enums: IndexMap<String, YamlatorEnum>,
}

impl YamlatorSchema {
    /// Create a schema from resolved parts
    pub fn new(
        root: YamlatorRuleset,
        rulesets: IndexMap<String, YamlatorRuleset>,
        enums: IndexMap<String, YamlatorEnum>,
    ) -> Self {
        Self {
            root,
            rulesets,
            enums,
        }
    }
}
