//! Namespace Tree - where free functions live and who can see them.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: `NamespaceData` (free functions declared at that level)
//! - Edges: `Contains(name)` for hierarchy, `Uses` for `using namespace`
//!
//! Two lookups depend on it: extension candidates visible from a call site,
//! and free-mode constraint requirements visible from the constraint's point
//! of definition.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};

use extcall_core::TypeHash;

/// Edge types in the namespace graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceEdge {
    /// Parent namespace contains child namespace.
    /// The String is the child's simple name.
    Contains(String),
    /// `using namespace` directive.
    /// Source namespace imports target namespace for lookup.
    Uses,
}

/// Data stored in each namespace node.
#[derive(Debug, Default)]
pub struct NamespaceData {
    /// Free functions in this namespace by simple name.
    /// Vec holds overloads with the same name.
    pub functions: FxHashMap<String, Vec<TypeHash>>,
}

/// The namespace graph.
pub struct NamespaceTree {
    graph: DiGraph<NamespaceData, NamespaceEdge>,
    root: NodeIndex,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    /// Create a new namespace tree with an empty root.
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        let root = graph.add_node(NamespaceData::default());
        Self { graph, root }
    }

    /// Get the root namespace node index.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Find a child namespace by name.
    pub fn find_child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.graph.edges(parent).find_map(|edge| match edge.weight() {
            NamespaceEdge::Contains(child_name) if child_name == name => Some(edge.target()),
            _ => None,
        })
    }

    /// Get or create a child namespace.
    pub fn get_or_create_child(&mut self, parent: NodeIndex, name: &str) -> NodeIndex {
        if let Some(child) = self.find_child(parent, name) {
            return child;
        }

        let child = self.graph.add_node(NamespaceData::default());
        self.graph
            .add_edge(parent, child, NamespaceEdge::Contains(name.to_string()));
        child
    }

    /// Get or create a namespace path from root.
    pub fn get_or_create_path<S: AsRef<str>>(&mut self, path: &[S]) -> NodeIndex {
        let mut current = self.root;
        for segment in path {
            current = self.get_or_create_child(current, segment.as_ref());
        }
        current
    }

    /// Get an existing namespace by path, or None if it doesn't exist.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<NodeIndex> {
        let mut current = self.root;
        for segment in path {
            current = self.find_child(current, segment.as_ref())?;
        }
        Some(current)
    }

    /// Find the parent namespace of a node.
    pub fn find_parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .find(|edge| matches!(edge.weight(), NamespaceEdge::Contains(_)))
            .map(|edge| edge.source())
    }

    /// Add a `using namespace` directive.
    pub fn add_using_directive(&mut self, from_ns: NodeIndex, target_ns: NodeIndex) {
        let exists = self
            .graph
            .edges(from_ns)
            .any(|edge| matches!(edge.weight(), NamespaceEdge::Uses) && edge.target() == target_ns);
        if !exists {
            self.graph.add_edge(from_ns, target_ns, NamespaceEdge::Uses);
        }
    }

    /// Get all namespaces imported via `using namespace` from a given namespace.
    pub fn get_using_directives(&self, ns: NodeIndex) -> Vec<NodeIndex> {
        self.graph
            .edges(ns)
            .filter(|edge| matches!(edge.weight(), NamespaceEdge::Uses))
            .map(|edge| edge.target())
            .collect()
    }

    /// Record a free function overload in a namespace.
    pub fn add_function<S: AsRef<str>>(&mut self, path: &[S], name: &str, func_hash: TypeHash) {
        let node = self.get_or_create_path(path);
        if let Some(data) = self.graph.node_weight_mut(node) {
            data.functions
                .entry(name.to_string())
                .or_default()
                .push(func_hash);
        }
    }

    /// All free functions named `name` visible from the namespace at `path`.
    ///
    /// Visible means declared in that namespace, in any enclosing namespace,
    /// or in a namespace imported by `using namespace` from any of those
    /// (transitively). A path that was never created still sees the global
    /// namespace and whatever prefix of the path exists.
    pub fn visible_functions<S: AsRef<str>>(&self, path: &[S], name: &str) -> Vec<TypeHash> {
        let mut start = self.root;
        for segment in path {
            match self.find_child(start, segment.as_ref()) {
                Some(child) => start = child,
                None => break,
            }
        }

        let mut scopes = Vec::new();
        let mut current = Some(start);
        while let Some(node) = current {
            scopes.push(node);
            current = self.find_parent(node);
        }

        let mut visited = FxHashSet::default();
        let mut found = Vec::new();
        while let Some(node) = scopes.pop() {
            if !visited.insert(node) {
                continue;
            }
            if let Some(overloads) = self
                .graph
                .node_weight(node)
                .and_then(|data| data.functions.get(name))
            {
                for hash in overloads {
                    if !found.contains(hash) {
                        found.push(*hash);
                    }
                }
            }
            scopes.extend(self.get_using_directives(node));
        }
        found
    }
}
