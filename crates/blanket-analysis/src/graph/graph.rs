//! Mutable mixed graph over named nodes, backed by a petgraph `StableUnGraph`.
//!
//! Edge marks live on the petgraph edge weight, oriented relative to petgraph's stored
//! `(a, b)` endpoint order. All removals funnel through [`Graph::after_removal`], which
//! prunes triple annotations whose middle node lost an adjacency.

use std::fmt;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableUnGraph};
use petgraph::visit::EdgeRef;

use blanket_core::errors::GraphError;
use blanket_core::types::collections::{FxHashMap, FxHashSet};

use super::edge::{Edge, Endpoint};
use super::node::Node;
use super::triple::Triple;

/// Endpoint marks of one stored edge, keyed to petgraph's `(a, b)` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Marks {
    pub(crate) at_a: Endpoint,
    pub(crate) at_b: Endpoint,
}

/// One incident edge seen from a node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Incidence {
    pub(crate) edge: EdgeIndex,
    pub(crate) other: NodeIndex,
    pub(crate) at_self: Endpoint,
    pub(crate) at_other: Endpoint,
}

/// Which annotation set a triple belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleKind {
    Ambiguous,
    Underline,
    DottedUnderline,
}

#[derive(Debug, Clone)]
pub struct Graph {
    pub(crate) inner: StableUnGraph<Node, Marks>,
    pub(crate) index: FxHashMap<String, NodeIndex>,
    single_connections: bool,
    ambiguous: FxHashSet<Triple>,
    underline: FxHashSet<Triple>,
    dotted_underline: FxHashSet<Triple>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Empty graph that allows several distinct edges per node pair.
    pub fn new() -> Self {
        Self {
            inner: StableUnGraph::default(),
            index: FxHashMap::default(),
            single_connections: false,
            ambiguous: FxHashSet::default(),
            underline: FxHashSet::default(),
            dotted_underline: FxHashSet::default(),
        }
    }

    /// Empty graph that allows at most one edge per node pair.
    pub fn single_connection() -> Self {
        Self {
            single_connections: true,
            ..Self::new()
        }
    }

    pub fn with_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node);
        }
        graph
    }

    pub fn is_single_connection(&self) -> bool {
        self.single_connections
    }

    // ---- node bookkeeping ----

    pub(crate) fn index_of(&self, node: &Node) -> Result<NodeIndex, GraphError> {
        self.index
            .get(node.name())
            .copied()
            .ok_or_else(|| GraphError::node(node.name()))
    }

    pub(crate) fn node_at(&self, idx: NodeIndex) -> &Node {
        &self.inner[idx]
    }

    /// Adds `node`; returns `false` when a node with that name already exists.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.index.contains_key(node.name()) {
            return false;
        }
        let name = node.name().to_string();
        let idx = self.inner.add_node(node);
        self.index.insert(name, idx);
        true
    }

    /// Removes `node`, its incident edges, and every triple that references it.
    pub fn remove_node(&mut self, node: &Node) -> Result<(), GraphError> {
        let idx = self.index_of(node)?;
        self.inner.remove_node(idx);
        self.index.remove(node.name());
        self.after_removal();
        Ok(())
    }

    /// Removes every node in `nodes`, or none of them if any is absent.
    pub fn remove_nodes(&mut self, nodes: &[Node]) -> Result<(), GraphError> {
        let idxs = nodes.iter().map(|n| self.index_of(n)).collect::<Result<Vec<_>, _>>()?;
        for (node, idx) in nodes.iter().zip(idxs) {
            self.inner.remove_node(idx);
            self.index.remove(node.name());
        }
        self.after_removal();
        Ok(())
    }

    pub fn contains_node(&self, node: &Node) -> bool {
        self.index.contains_key(node.name())
    }

    /// Looks a node up by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&idx| &self.inner[idx])
    }

    /// Nodes in slot order.
    pub fn nodes(&self) -> Vec<Node> {
        self.inner.node_indices().map(|i| self.inner[i].clone()).collect()
    }

    pub fn node_names(&self) -> Vec<String> {
        self.inner
            .node_indices()
            .map(|i| self.inner[i].name().to_string())
            .collect()
    }

    pub fn num_nodes(&self) -> usize {
        self.inner.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.inner.edge_count()
    }

    // ---- edge bookkeeping ----

    fn edge_at(&self, e: EdgeIndex) -> Option<Edge> {
        let (a, b) = self.inner.edge_endpoints(e)?;
        let marks = self.inner.edge_weight(e)?;
        Some(Edge::new(
            self.inner[a].clone(),
            self.inner[b].clone(),
            marks.at_a,
            marks.at_b,
        ))
    }

    /// Incident edges of `idx`, sorted by the other node's slot, then edge slot.
    pub(crate) fn incidences(&self, idx: NodeIndex) -> Vec<Incidence> {
        let mut out: Vec<Incidence> = self
            .inner
            .edges(idx)
            .filter_map(|er| {
                let id = er.id();
                let (a, b) = self.inner.edge_endpoints(id)?;
                let marks = self.inner.edge_weight(id)?;
                Some(if a == idx {
                    Incidence {
                        edge: id,
                        other: b,
                        at_self: marks.at_a,
                        at_other: marks.at_b,
                    }
                } else {
                    Incidence {
                        edge: id,
                        other: a,
                        at_self: marks.at_b,
                        at_other: marks.at_a,
                    }
                })
            })
            .collect();
        out.sort_by_key(|inc| (inc.other.index(), inc.edge.index()));
        out
    }

    pub(crate) fn adjacent_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.incidences(idx).into_iter().map(|i| i.other).collect();
        out.dedup();
        out
    }

    pub(crate) fn parent_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .incidences(idx)
            .into_iter()
            .filter(|i| i.at_self == Endpoint::Arrow && i.at_other == Endpoint::Tail)
            .map(|i| i.other)
            .collect();
        out.dedup();
        out
    }

    pub(crate) fn child_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .incidences(idx)
            .into_iter()
            .filter(|i| i.at_self == Endpoint::Tail && i.at_other == Endpoint::Arrow)
            .map(|i| i.other)
            .collect();
        out.dedup();
        out
    }

    pub(crate) fn spouse_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self
            .incidences(idx)
            .into_iter()
            .filter(|i| i.at_self == Endpoint::Arrow && i.at_other == Endpoint::Arrow)
            .map(|i| i.other)
            .collect();
        out.dedup();
        out
    }

    fn to_nodes(&self, indices: Vec<NodeIndex>) -> Vec<Node> {
        indices.into_iter().map(|i| self.inner[i].clone()).collect()
    }

    /// All edges in slot order.
    pub fn edges(&self) -> Vec<Edge> {
        self.inner.edge_indices().filter_map(|e| self.edge_at(e)).collect()
    }

    pub fn edges_of(&self, node: &Node) -> Result<Vec<Edge>, GraphError> {
        let idx = self.index_of(node)?;
        Ok(self
            .incidences(idx)
            .into_iter()
            .filter_map(|i| self.edge_at(i.edge))
            .collect())
    }

    pub fn edges_between(&self, a: &Node, b: &Node) -> Result<Vec<Edge>, GraphError> {
        let ai = self.index_of(a)?;
        let bi = self.index_of(b)?;
        Ok(self
            .incidences(ai)
            .into_iter()
            .filter(|i| i.other == bi)
            .filter_map(|i| self.edge_at(i.edge))
            .collect())
    }

    /// First edge between `a` and `b`, if any.
    pub fn edge(&self, a: &Node, b: &Node) -> Result<Option<Edge>, GraphError> {
        Ok(self.edges_between(a, b)?.into_iter().next())
    }

    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges_between(edge.node1(), edge.node2())
            .map(|edges| edges.contains(edge))
            .unwrap_or(false)
    }

    /// Inserts `edge`. Returns `Ok(false)` for a self loop, a duplicate, or a second
    /// edge on a pair in single-connection mode.
    pub fn add_edge(&mut self, edge: Edge) -> Result<bool, GraphError> {
        let a = self.index_of(edge.node1())?;
        let b = self.index_of(edge.node2())?;
        if a == b {
            return Ok(false);
        }
        let existing = self.edges_between(edge.node1(), edge.node2())?;
        if (self.single_connections && !existing.is_empty()) || existing.contains(&edge) {
            return Ok(false);
        }
        self.inner.add_edge(
            a,
            b,
            Marks {
                at_a: edge.endpoint1(),
                at_b: edge.endpoint2(),
            },
        );
        Ok(true)
    }

    pub fn add_directed_edge(&mut self, from: &Node, to: &Node) -> Result<bool, GraphError> {
        self.add_edge(Edge::directed(from, to))
    }

    pub fn add_undirected_edge(&mut self, a: &Node, b: &Node) -> Result<bool, GraphError> {
        self.add_edge(Edge::undirected(a, b))
    }

    pub fn add_bidirected_edge(&mut self, a: &Node, b: &Node) -> Result<bool, GraphError> {
        self.add_edge(Edge::bidirected(a, b))
    }

    pub fn remove_edge(&mut self, edge: &Edge) -> Result<(), GraphError> {
        let a = self.index_of(edge.node1())?;
        let found = self
            .incidences(a)
            .into_iter()
            .find(|i| self.edge_at(i.edge).as_ref() == Some(edge))
            .map(|i| i.edge);
        match found {
            Some(e) => {
                self.inner.remove_edge(e);
                self.after_removal();
                Ok(())
            }
            None => Err(GraphError::EdgeNotInGraph {
                edge: edge.to_string(),
            }),
        }
    }

    /// Removes every edge between `a` and `b`; returns how many were removed.
    pub fn remove_edges_between(&mut self, a: &Node, b: &Node) -> Result<usize, GraphError> {
        let ai = self.index_of(a)?;
        let bi = self.index_of(b)?;
        let doomed: Vec<EdgeIndex> = self
            .incidences(ai)
            .into_iter()
            .filter(|i| i.other == bi)
            .map(|i| i.edge)
            .collect();
        for e in &doomed {
            self.inner.remove_edge(*e);
        }
        if !doomed.is_empty() {
            self.after_removal();
        }
        Ok(doomed.len())
    }

    pub fn remove_edges(&mut self, edges: &[Edge]) -> Result<(), GraphError> {
        for edge in edges {
            self.remove_edge(edge)?;
        }
        Ok(())
    }

    /// Removes every edge, keeping nodes. Triples go with them.
    pub fn clear_edges(&mut self) {
        self.inner.clear_edges();
        self.after_removal();
    }

    /// Replaces whatever connects `a` and `b` with `edge`. Adjacency is preserved, so
    /// triple annotations stay valid.
    pub(crate) fn replace_edges_between(&mut self, edge: Edge) -> Result<(), GraphError> {
        let a = self.index_of(edge.node1())?;
        let b = self.index_of(edge.node2())?;
        let current: Vec<EdgeIndex> = self
            .incidences(a)
            .into_iter()
            .filter(|i| i.other == b)
            .map(|i| i.edge)
            .collect();
        if current.is_empty() {
            return Err(GraphError::EdgeNotInGraph {
                edge: edge.to_string(),
            });
        }
        for e in current {
            self.inner.remove_edge(e);
        }
        self.inner.add_edge(
            a,
            b,
            Marks {
                at_a: edge.endpoint1(),
                at_b: edge.endpoint2(),
            },
        );
        Ok(())
    }

    /// Orients the connection between `from` and `to` as `from --> to`.
    pub fn orient(&mut self, from: &Node, to: &Node) -> Result<(), GraphError> {
        self.replace_edges_between(Edge::directed(from, to))
    }

    /// Sets the mark at `to` on the edge between `from` and `to`.
    pub fn set_endpoint(&mut self, from: &Node, to: &Node, endpoint: Endpoint) -> Result<(), GraphError> {
        let edge = self.edge(from, to)?.ok_or_else(|| GraphError::EdgeNotInGraph {
            edge: format!("{from} ... {to}"),
        })?;
        let updated = edge
            .with_endpoint_at(to, endpoint)
            .ok_or_else(|| GraphError::node(to.name()))?;
        self.replace_edges_between(updated)
    }

    /// Mark at `b` on the first edge between `a` and `b`.
    pub fn endpoint(&self, a: &Node, b: &Node) -> Result<Option<Endpoint>, GraphError> {
        Ok(self.edge(a, b)?.and_then(|e| e.endpoint_at(b)))
    }

    // ---- neighborhood queries ----

    pub fn is_adjacent(&self, a: &Node, b: &Node) -> Result<bool, GraphError> {
        let ai = self.index_of(a)?;
        let bi = self.index_of(b)?;
        Ok(self.inner.find_edge(ai, bi).is_some())
    }

    pub fn adjacent_nodes(&self, node: &Node) -> Result<Vec<Node>, GraphError> {
        let idx = self.index_of(node)?;
        Ok(self.to_nodes(self.adjacent_indices(idx)))
    }

    pub fn parents(&self, node: &Node) -> Result<Vec<Node>, GraphError> {
        let idx = self.index_of(node)?;
        Ok(self.to_nodes(self.parent_indices(idx)))
    }

    pub fn children(&self, node: &Node) -> Result<Vec<Node>, GraphError> {
        let idx = self.index_of(node)?;
        Ok(self.to_nodes(self.child_indices(idx)))
    }

    pub fn degree(&self, node: &Node) -> Result<usize, GraphError> {
        let idx = self.index_of(node)?;
        Ok(self.incidences(idx).len())
    }

    pub fn indegree(&self, node: &Node) -> Result<usize, GraphError> {
        Ok(self.parents(node)?.len())
    }

    /// Adjacents `w` whose end of the edge `node ... w` carries `endpoint`.
    pub fn nodes_out_to(&self, node: &Node, endpoint: Endpoint) -> Result<Vec<Node>, GraphError> {
        let idx = self.index_of(node)?;
        let mut out: Vec<NodeIndex> = self
            .incidences(idx)
            .into_iter()
            .filter(|i| i.at_other == endpoint)
            .map(|i| i.other)
            .collect();
        out.dedup();
        Ok(self.to_nodes(out))
    }

    /// Adjacents `w` whose edge `w ... node` carries `endpoint` at `node`.
    pub fn nodes_in_to(&self, node: &Node, endpoint: Endpoint) -> Result<Vec<Node>, GraphError> {
        let idx = self.index_of(node)?;
        let mut out: Vec<NodeIndex> = self
            .incidences(idx)
            .into_iter()
            .filter(|i| i.at_self == endpoint)
            .map(|i| i.other)
            .collect();
        out.dedup();
        Ok(self.to_nodes(out))
    }

    pub fn is_parent_of(&self, parent: &Node, child: &Node) -> Result<bool, GraphError> {
        Ok(self
            .edges_between(parent, child)?
            .iter()
            .any(|e| e.points_from_to(parent, child)))
    }

    pub fn is_directed_from_to(&self, from: &Node, to: &Node) -> Result<bool, GraphError> {
        self.is_parent_of(from, to)
    }

    pub fn is_undirected_from_to(&self, a: &Node, b: &Node) -> Result<bool, GraphError> {
        Ok(self.edges_between(a, b)?.iter().any(Edge::is_undirected))
    }

    pub fn is_bidirected_between(&self, a: &Node, b: &Node) -> Result<bool, GraphError> {
        Ok(self.edges_between(a, b)?.iter().any(Edge::is_bidirected))
    }

    /// `a *-> b <-* c`
    pub fn is_def_collider(&self, a: &Node, b: &Node, c: &Node) -> Result<bool, GraphError> {
        let into_b = |x: &Node| -> Result<bool, GraphError> {
            Ok(self
                .edges_between(x, b)?
                .iter()
                .any(|e| e.endpoint_at(b) == Some(Endpoint::Arrow)))
        };
        Ok(into_b(a)? && into_b(c)?)
    }

    // ---- triples ----

    fn triple_set(&self, kind: TripleKind) -> &FxHashSet<Triple> {
        match kind {
            TripleKind::Ambiguous => &self.ambiguous,
            TripleKind::Underline => &self.underline,
            TripleKind::DottedUnderline => &self.dotted_underline,
        }
    }

    fn triple_set_mut(&mut self, kind: TripleKind) -> &mut FxHashSet<Triple> {
        match kind {
            TripleKind::Ambiguous => &mut self.ambiguous,
            TripleKind::Underline => &mut self.underline,
            TripleKind::DottedUnderline => &mut self.dotted_underline,
        }
    }

    fn triple_is_supported(&self, t: &Triple) -> bool {
        t.x != t.z
            && self.is_adjacent(&t.x, &t.y).unwrap_or(false)
            && self.is_adjacent(&t.z, &t.y).unwrap_or(false)
    }

    fn check_triple(&self, t: &Triple) -> Result<(), GraphError> {
        self.index_of(&t.x)?;
        self.index_of(&t.y)?;
        self.index_of(&t.z)?;
        if self.triple_is_supported(t) {
            Ok(())
        } else {
            Err(GraphError::InvalidTriple {
                x: t.x.name().to_string(),
                y: t.y.name().to_string(),
                z: t.z.name().to_string(),
            })
        }
    }

    pub fn add_triple(&mut self, kind: TripleKind, x: &Node, y: &Node, z: &Node) -> Result<(), GraphError> {
        let triple = Triple::new(x, y, z);
        self.check_triple(&triple)?;
        self.triple_set_mut(kind).insert(triple);
        Ok(())
    }

    pub fn remove_triple(&mut self, kind: TripleKind, x: &Node, y: &Node, z: &Node) -> bool {
        self.triple_set_mut(kind).remove(&Triple::new(x, y, z))
    }

    pub fn is_triple(&self, kind: TripleKind, x: &Node, y: &Node, z: &Node) -> bool {
        self.triple_set(kind).contains(&Triple::new(x, y, z))
    }

    /// Triples of `kind`, sorted for stable output.
    pub fn triples(&self, kind: TripleKind) -> Vec<Triple> {
        let mut out: Vec<Triple> = self.triple_set(kind).iter().cloned().collect();
        out.sort_by(|a, b| (&a.y, &a.x, &a.z).cmp(&(&b.y, &b.x, &b.z)));
        out
    }

    /// Replaces the whole set of `kind`. Every triple is validated before anything changes.
    pub fn set_triples(&mut self, kind: TripleKind, triples: Vec<Triple>) -> Result<(), GraphError> {
        for t in &triples {
            self.check_triple(t)?;
        }
        *self.triple_set_mut(kind) = triples.into_iter().collect();
        Ok(())
    }

    pub fn add_ambiguous_triple(&mut self, x: &Node, y: &Node, z: &Node) -> Result<(), GraphError> {
        self.add_triple(TripleKind::Ambiguous, x, y, z)
    }

    pub fn add_underline_triple(&mut self, x: &Node, y: &Node, z: &Node) -> Result<(), GraphError> {
        self.add_triple(TripleKind::Underline, x, y, z)
    }

    pub fn add_dotted_underline_triple(&mut self, x: &Node, y: &Node, z: &Node) -> Result<(), GraphError> {
        self.add_triple(TripleKind::DottedUnderline, x, y, z)
    }

    pub fn is_ambiguous_triple(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.is_triple(TripleKind::Ambiguous, x, y, z)
    }

    pub fn is_underline_triple(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.is_triple(TripleKind::Underline, x, y, z)
    }

    pub fn ambiguous_triples(&self) -> Vec<Triple> {
        self.triples(TripleKind::Ambiguous)
    }

    pub fn set_ambiguous_triples(&mut self, triples: Vec<Triple>) -> Result<(), GraphError> {
        self.set_triples(TripleKind::Ambiguous, triples)
    }

    /// Single choke point after any structural removal.
    fn after_removal(&mut self) {
        for kind in [TripleKind::Ambiguous, TripleKind::Underline, TripleKind::DottedUnderline] {
            let stale: Vec<Triple> = self
                .triple_set(kind)
                .iter()
                .filter(|t| !self.triple_is_supported(t))
                .cloned()
                .collect();
            if !stale.is_empty() {
                tracing::trace!(count = stale.len(), ?kind, "pruned unsupported triples");
                let set = self.triple_set_mut(kind);
                for t in &stale {
                    set.remove(t);
                }
            }
        }
    }

    // ---- derived graphs ----

    /// Induced subgraph over `nodes`, keeping the connection mode and surviving triples.
    pub fn subgraph(&self, nodes: &[Node]) -> Result<Graph, GraphError> {
        let keep: FxHashSet<NodeIndex> = nodes
            .iter()
            .map(|n| self.index_of(n))
            .collect::<Result<_, _>>()?;
        let mut sub = Graph {
            single_connections: self.single_connections,
            ..Graph::new()
        };
        for idx in self.inner.node_indices().filter(|i| keep.contains(i)) {
            sub.add_node(self.inner[idx].clone());
        }
        for e in self.inner.edge_indices() {
            if let Some((a, b)) = self.inner.edge_endpoints(e) {
                if keep.contains(&a) && keep.contains(&b) {
                    if let Some(edge) = self.edge_at(e) {
                        sub.add_edge(edge)?;
                    }
                }
            }
        }
        for kind in [TripleKind::Ambiguous, TripleKind::Underline, TripleKind::DottedUnderline] {
            let kept: Vec<Triple> = self
                .triple_set(kind)
                .iter()
                .filter(|t| sub.contains_node(&t.x) && sub.contains_node(&t.y) && sub.contains_node(&t.z))
                .cloned()
                .collect();
            sub.set_triples(kind, kept)?;
        }
        Ok(sub)
    }

    /// Same nodes, every edge made undirected.
    pub fn undirected_copy(&self) -> Graph {
        let mut out = Graph::with_nodes(self.nodes());
        out.single_connections = self.single_connections;
        for e in self.edges() {
            let _ = out.add_edge(Edge::undirected(e.node1(), e.node2()));
        }
        out
    }

    fn canonical_edges(&self) -> Vec<(String, Endpoint, String, Endpoint)> {
        let mut out: Vec<_> = self
            .edges()
            .iter()
            .map(|e| {
                let (a, ea, b, eb) = e.canonical();
                (a.to_string(), ea, b.to_string(), eb)
            })
            .collect();
        out.sort();
        out
    }
}

impl PartialEq for Graph {
    /// Same node names and the same edges; triple annotations are not compared.
    fn eq(&self, other: &Self) -> bool {
        let mut mine = self.node_names();
        let mut theirs = other.node_names();
        mine.sort();
        theirs.sort();
        mine == theirs && self.canonical_edges() == other.canonical_edges()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Graph Nodes:")?;
        writeln!(f, "{}", self.node_names().join(";"))?;
        writeln!(f)?;
        writeln!(f, "Graph Edges:")?;
        for (i, edge) in self.edges().iter().enumerate() {
            writeln!(f, "{}. {}", i + 1, edge)?;
        }
        Ok(())
    }
}
