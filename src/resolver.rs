//! Schema resolution pipeline
//!
//! Takes a partially loaded schema through import resolution,
//! inheritance flattening and reference resolution, producing a
//! [`YamlatorSchema`]. Imported files run through the same pipeline
//! recursively; a single dependency graph is threaded through the run
//! so cyclic import chains abort before anything is returned.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::dependencies::{content_hash, DependencyManager, NodeId};
use crate::error::{Error, Result};
use crate::grammar;
use crate::loaders;
use crate::types::{
    PartiallyLoadedSchema, Rule, RuleType, YamlatorEnum, YamlatorRuleset, YamlatorSchema,
};

impl YamlatorSchema {
    /// Load and resolve a schema file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        resolve_schema(path.as_ref())
    }

    /// Parse and resolve schema text
    ///
    /// Imports are resolved relative to the current directory.
    pub fn from_string(source: &str) -> Result<Self> {
        let mut graph = DependencyManager::new();
        let node = graph.add(content_hash(source));
        let partial = grammar::parse_schema(source)?;
        resolve_partial(partial, Path::new("."), node, &mut graph)
    }
}

/// Load, parse and fully resolve a schema file
pub fn resolve_schema(path: &Path) -> Result<YamlatorSchema> {
    let mut graph = DependencyManager::new();
    resolve_file(path, &mut graph)
}

fn resolve_file(path: &Path, graph: &mut DependencyManager) -> Result<YamlatorSchema> {
    let text = loaders::load_schema(path)?;
    let node = graph.add(content_hash(&text));
    let partial = grammar::parse_schema(&text)?;
    resolve_partial(partial, &base_dir(path), node, graph)
}

fn resolve_partial(
    partial: PartiallyLoadedSchema,
    base_path: &Path,
    node: NodeId,
    graph: &mut DependencyManager,
) -> Result<YamlatorSchema> {
    let partial = load_schema_imports(partial, base_path, node, graph)?;
    let PartiallyLoadedSchema {
        root,
        rulesets,
        enums,
        ..
    } = partial;

    let rulesets = resolve_ruleset_inheritance(rulesets)?;
    let (root, rulesets) = resolve_unresolved_types(root, rulesets, &enums)?;

    Ok(YamlatorSchema::new(root, rulesets, enums))
}

fn base_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve every import of a partial schema
///
/// Each imported file is loaded, hashed, registered in the dependency
/// graph and resolved through the full pipeline. The requested items
/// are copied into the importer's tables under their (possibly
/// namespaced) names, overwriting same-named local constructs.
pub fn load_schema_imports(
    mut partial: PartiallyLoadedSchema,
    base_path: &Path,
    parent: NodeId,
    graph: &mut DependencyManager,
) -> Result<PartiallyLoadedSchema> {
    if base_path.as_os_str().is_empty() {
        return Err(Error::Value("base path must not be empty".to_string()));
    }

    let imports = std::mem::take(&mut partial.imports);
    for import in imports {
        let import_path = base_path.join(&import.source_path);
        let text = loaders::load_schema(&import_path)?;

        let child = graph.add(content_hash(&text));
        graph.add_child(parent, child);
        if graph.has_cycle() {
            return Err(Error::CycleDependency(format!(
                "importing '{}' creates a cyclic import chain",
                import_path.display()
            )));
        }

        let imported = grammar::parse_schema(&text)?;
        let resolved = resolve_partial(imported, &base_dir(&import_path), child, graph)?;

        let key = import.qualified_name();
        if let Some(ruleset) = resolved.rulesets.get(&import.item) {
            partial.rulesets.insert(key, ruleset.clone());
        } else if let Some(imported_enum) = resolved.enums.get(&import.item) {
            partial.enums.insert(key, imported_enum.clone());
        } else {
            return Err(Error::ConstructNotFound(format!(
                "'{}' is not defined in '{}'",
                import.item,
                import_path.display()
            )));
        }
    }

    Ok(partial)
}

/// Flatten ruleset inheritance until no parent references remain
///
/// Rules come parent-first; a child rule with the same name as a
/// parent rule replaces it at the child's position. Chains and shared
/// parents of any depth are supported.
pub fn resolve_ruleset_inheritance(
    rulesets: IndexMap<String, YamlatorRuleset>,
) -> Result<IndexMap<String, YamlatorRuleset>> {
    let mut resolved: IndexMap<String, YamlatorRuleset> = IndexMap::new();
    let mut pending: IndexMap<String, YamlatorRuleset> = IndexMap::new();

    for (name, ruleset) in rulesets {
        if ruleset.parent.is_none() {
            resolved.insert(name, ruleset);
        } else {
            pending.insert(name, ruleset);
        }
    }

    for ruleset in pending.values() {
        if let Some(parent) = &ruleset.parent {
            if !resolved.contains_key(parent) && !pending.contains_key(parent) {
                return Err(Error::ConstructNotFound(format!(
                    "parent ruleset '{}' of '{}' is not defined",
                    parent, ruleset.name
                )));
            }
        }
    }

    while !pending.is_empty() {
        let ready: Vec<String> = pending
            .iter()
            .filter(|(_, ruleset)| match &ruleset.parent {
                Some(parent) => resolved.contains_key(parent),
                None => true,
            })
            .map(|(name, _)| name.clone())
            .collect();

        if ready.is_empty() {
            let names: Vec<&str> = pending.keys().map(String::as_str).collect();
            return Err(Error::CycleDependency(format!(
                "cyclic ruleset inheritance among: {}",
                names.join(", ")
            )));
        }

        for name in ready {
            if let Some(mut ruleset) = pending.shift_remove(&name) {
                if let Some(parent_name) = ruleset.parent.take() {
                    if let Some(parent) = resolved.get(&parent_name) {
                        ruleset.rules = merge_rules(&parent.rules, ruleset.rules);
                    }
                }
                resolved.insert(name, ruleset);
            }
        }
    }

    Ok(resolved)
}

fn merge_rules(parent: &[Rule], child: Vec<Rule>) -> Vec<Rule> {
    let mut merged: Vec<Rule> = parent
        .iter()
        .filter(|rule| !child.iter().any(|own| own.name == rule.name))
        .cloned()
        .collect();
    merged.extend(child);
    merged
}

/// Rewrite every remaining unresolved reference
///
/// Runs only after imports and inheritance so references can point at
/// imported or inherited constructs. Rulesets shadow enums with the
/// same name; a name found in neither table is an error.
pub fn resolve_unresolved_types(
    root: YamlatorRuleset,
    rulesets: IndexMap<String, YamlatorRuleset>,
    enums: &IndexMap<String, YamlatorEnum>,
) -> Result<(YamlatorRuleset, IndexMap<String, YamlatorRuleset>)> {
    let ruleset_names: HashSet<String> = rulesets.keys().cloned().collect();

    let root = resolve_rule_types(root, &ruleset_names, enums)?;

    let mut result = IndexMap::with_capacity(rulesets.len());
    for (name, ruleset) in rulesets {
        result.insert(name, resolve_rule_types(ruleset, &ruleset_names, enums)?);
    }

    Ok((root, result))
}

fn resolve_rule_types(
    mut ruleset: YamlatorRuleset,
    ruleset_names: &HashSet<String>,
    enums: &IndexMap<String, YamlatorEnum>,
) -> Result<YamlatorRuleset> {
    for rule in &mut ruleset.rules {
        let rtype = std::mem::replace(&mut rule.rtype, RuleType::Any);
        rule.rtype = resolve_type(rtype, ruleset_names, enums)?;
    }
    Ok(ruleset)
}

fn resolve_type(
    rtype: RuleType,
    ruleset_names: &HashSet<String>,
    enums: &IndexMap<String, YamlatorEnum>,
) -> Result<RuleType> {
    match rtype {
        RuleType::Unresolved(name) => {
            if ruleset_names.contains(&name) {
                Ok(RuleType::Ruleset(name))
            } else if enums.contains_key(&name) {
                Ok(RuleType::Enum(name))
            } else {
                Err(Error::ConstructNotFound(format!(
                    "type '{}' is not a declared ruleset or enum",
                    name
                )))
            }
        }
        RuleType::List(inner) => Ok(RuleType::List(Box::new(resolve_type(
            *inner,
            ruleset_names,
            enums,
        )?))),
        RuleType::Map(inner) => Ok(RuleType::Map(Box::new(resolve_type(
            *inner,
            ruleset_names,
            enums,
        )?))),
        RuleType::Union(members) => {
            let mut resolved = Vec::with_capacity(members.len());
            for member in members {
                resolved.push(resolve_type(member, ruleset_names, enums)?);
            }
            Ok(RuleType::Union(resolved))
        }
        other => Ok(other),
    }
}
