//! Type graph wrapper using petgraph::StableDiGraph, plus corpus-wide validation

use crate::error::{Result, TypeGraphError};
use crate::model::*;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

/// The type-dependency graph. Nodes and edges are value-deduplicated.
pub struct TypeGraph {
    inner: StableDiGraph<TypeDeclaration, RefKind>,
    index: HashMap<TypeDeclaration, NodeIndex>,
    nodes: BTreeSet<TypeDeclaration>,
    edges: BTreeSet<ReferenceEdge>,
}

impl std::fmt::Debug for TypeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeGraph")
            .field("node_count", &self.nodes.len())
            .field("edge_count", &self.edges.len())
            .finish()
    }
}

/// Summary produced by a successful [`TypeGraph::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub node_count: usize,
    pub edge_count: usize,
    /// Types with neither incoming nor outgoing edges.
    pub unreferenced: Vec<TypeDeclaration>,
    pub kind_counts: BTreeMap<RefKind, usize>,
}

impl TypeGraph {
    pub fn new() -> Self {
        TypeGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
            nodes: BTreeSet::new(),
            edges: BTreeSet::new(),
        }
    }

    /// Add a node. Returns false if an identical declaration was already present.
    pub fn add_node(&mut self, node: TypeDeclaration) -> bool {
        if self.index.contains_key(&node) {
            return false;
        }
        let idx = self.inner.add_node(node.clone());
        self.index.insert(node.clone(), idx);
        self.nodes.insert(node);
        true
    }

    /// Add an edge. Returns false if the (caller, callee, kind) triple was already present.
    ///
    /// Edges whose endpoints are not nodes are still recorded so that
    /// [`TypeGraph::validate`] can report them.
    pub fn add_edge(&mut self, edge: ReferenceEdge) -> bool {
        if self.edges.contains(&edge) {
            return false;
        }
        if let (Some(&source), Some(&target)) = (self.index.get(&edge.caller), self.index.get(&edge.callee)) {
            self.inner.add_edge(source, target, edge.kind);
        }
        self.edges.insert(edge);
        true
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// All nodes, in sorted order.
    pub fn nodes(&self) -> &BTreeSet<TypeDeclaration> {
        &self.nodes
    }

    /// All edges, in sorted order.
    pub fn edges(&self) -> &BTreeSet<ReferenceEdge> {
        &self.edges
    }

    pub fn contains_node(&self, node: &TypeDeclaration) -> bool {
        self.index.contains_key(node)
    }

    /// Check if an edge exists between two named types with a specific kind.
    pub fn has_edge_between(&self, caller: &str, callee: &str, kind: RefKind) -> bool {
        self.edges
            .iter()
            .any(|e| e.caller.name == caller && e.callee.name == callee && e.kind == kind)
    }

    /// Find a node by name (first match in sorted order).
    pub fn find_node_by_name(&self, name: &str) -> Option<&TypeDeclaration> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Types `node` refers to, with the kind of each reference.
    pub fn dependencies(&self, node: &TypeDeclaration) -> Vec<(&TypeDeclaration, RefKind)> {
        self.neighbors(node, Direction::Outgoing)
    }

    /// Types that refer to `node`, with the kind of each reference.
    pub fn dependents(&self, node: &TypeDeclaration) -> Vec<(&TypeDeclaration, RefKind)> {
        self.neighbors(node, Direction::Incoming)
    }

    fn neighbors(&self, node: &TypeDeclaration, direction: Direction) -> Vec<(&TypeDeclaration, RefKind)> {
        let Some(&idx) = self.index.get(node) else {
            return Vec::new();
        };
        let mut found: Vec<_> = self
            .inner
            .edges_directed(idx, direction)
            .filter_map(|edge_ref| {
                let other = match direction {
                    Direction::Outgoing => edge_ref.target(),
                    Direction::Incoming => edge_ref.source(),
                };
                self.inner.node_weight(other).map(|n| (n, *edge_ref.weight()))
            })
            .collect();
        found.sort();
        found
    }

    /// Nodes with no incoming or outgoing edge.
    pub fn unreferenced(&self) -> Vec<TypeDeclaration> {
        self.nodes
            .iter()
            .filter(|n| {
                self.index
                    .get(*n)
                    .is_some_and(|&idx| self.inner.neighbors_undirected(idx).next().is_none())
            })
            .cloned()
            .collect()
    }

    /// Check corpus-wide invariants. Runs once, after assembly.
    ///
    /// Fails on the first pair of distinct declarations sharing a name, then on
    /// the first edge with an endpoint outside the node set.
    pub fn validate(&self) -> Result<ValidationReport> {
        let mut type_names: HashMap<&str, &TypeDeclaration> = HashMap::new();
        for node in &self.nodes {
            if let Some(previous) = type_names.insert(node.name.as_str(), node) {
                return Err(TypeGraphError::NameCollision {
                    name: node.name.clone(),
                    first: describe(previous),
                    second: describe(node),
                });
            }
        }

        for edge in &self.edges {
            if !self.contains_node(&edge.caller) || !self.contains_node(&edge.callee) {
                return Err(TypeGraphError::DanglingEdge {
                    caller: edge.caller.name.clone(),
                    callee: edge.callee.name.clone(),
                    kind: edge.kind,
                });
            }
        }

        let unreferenced = self.unreferenced();
        if !unreferenced.is_empty() {
            info!("{} unreferenced types", unreferenced.len());
            debug!(
                "Unreferenced types: {}",
                unreferenced.iter().map(|n| n.name.as_str()).collect::<Vec<_>>().join(", ")
            );
        }

        let mut kind_counts = BTreeMap::new();
        for edge in &self.edges {
            *kind_counts.entry(edge.kind).or_insert(0) += 1;
        }

        info!("Data verified and no anomaly found");
        Ok(ValidationReport {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            unreferenced,
            kind_counts,
        })
    }
}

fn describe(node: &TypeDeclaration) -> String {
    match node.source_kind {
        SourceKind::Header => format!("header {}", node.source_name),
        SourceKind::CompilationUnit => format!("source {}", node.source_name),
    }
}

impl Default for TypeGraph {
    fn default() -> Self {
        Self::new()
    }
}
