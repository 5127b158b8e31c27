//! Schema dependency graph
//!
//! Tracks which schema files import which others so cyclic import
//! chains are caught during resolution. Nodes are identified by the
//! SHA-256 digest of the schema text and stored in an index arena.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

/// Index of a node in the dependency graph
pub type NodeId = usize;

/// Compute the content identity of schema text
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Directed graph of schema dependencies
#[derive(Debug, Default)]
pub struct DependencyManager {
    identities: Vec<String>,
    ids: HashMap<String, NodeId>,
    children: Vec<Vec<NodeId>>,
}

impl DependencyManager {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node for an identity, returning its id
    ///
    /// Adding the same identity twice returns the existing id and
    /// leaves the graph unchanged.
    pub fn add(&mut self, identity: impl Into<String>) -> NodeId {
        let identity = identity.into();
        if let Some(&id) = self.ids.get(&identity) {
            return id;
        }
        let id = self.identities.len();
        self.identities.push(identity.clone());
        self.ids.insert(identity, id);
        self.children.push(Vec::new());
        id
    }

    /// Add a dependency edge from parent to child
    ///
    /// Both ends must be registered ids; an edge naming an unknown node
    /// is ignored. Self-loops are stored; `has_cycle` reports them.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if child >= self.identities.len() {
            return;
        }
        if let Some(edges) = self.children.get_mut(parent) {
            edges.push(child);
        }
    }

    /// Number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.identities.len()
    }

    /// Check whether the graph contains a cycle
    pub fn has_cycle(&self) -> bool {
        let mut visited = vec![false; self.identities.len()];
        let mut in_stack = vec![false; self.identities.len()];

        for start in 0..self.identities.len() {
            if !visited[start] && self.walk(start, &mut visited, &mut in_stack) {
                return true;
            }
        }
        false
    }

    fn walk(&self, node: NodeId, visited: &mut [bool], in_stack: &mut [bool]) -> bool {
        visited[node] = true;
        in_stack[node] = true;
        for &child in &self.children[node] {
            if in_stack[child] {
                return true;
            }
            if !visited[child] && self.walk(child, visited, in_stack) {
                return true;
            }
        }
        in_stack[node] = false;
        false
    }
}
