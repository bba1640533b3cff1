//! Meek orientation rules for propagating edge directions through a pattern.

use blanket_core::errors::GraphError;

use super::edge::Edge;
use super::graph::Graph;
use super::knowledge::Knowledge;
use super::node::Node;

/// Applies rules R1-R3 (and R4 when knowledge is present) until nothing changes.
///
/// Rule 1 never fires through an ambiguous triple.
#[derive(Debug, Clone, Default)]
pub struct MeekRules<'k> {
    knowledge: Option<&'k Knowledge>,
    aggressively_prevent_cycles: bool,
}

impl<'k> MeekRules<'k> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_knowledge(mut self, knowledge: &'k Knowledge) -> Self {
        self.knowledge = Some(knowledge);
        self
    }

    /// Refuse any orientation that would close a directed cycle.
    pub fn aggressively_prevent_cycles(mut self, enabled: bool) -> Self {
        self.aggressively_prevent_cycles = enabled;
        self
    }

    /// Orients every implied edge; returns the newly directed edges in order.
    pub fn orient_implied(&self, graph: &mut Graph) -> Result<Vec<Edge>, GraphError> {
        let mut oriented = Vec::new();
        let use_r4 = self.knowledge.is_some_and(|k| !k.is_empty());
        loop {
            let before = oriented.len();
            for b in graph.nodes() {
                self.rule1(graph, &b, &mut oriented)?;
                self.rule2(graph, &b, &mut oriented)?;
                self.rule3(graph, &b, &mut oriented)?;
                if use_r4 {
                    self.rule4(graph, &b, &mut oriented)?;
                }
            }
            if oriented.len() == before {
                break;
            }
        }
        if !oriented.is_empty() {
            tracing::trace!(count = oriented.len(), "meek rules oriented edges");
        }
        Ok(oriented)
    }

    fn undirected_neighbors(graph: &Graph, node: &Node) -> Result<Vec<Node>, GraphError> {
        let mut out = Vec::new();
        for other in graph.adjacent_nodes(node)? {
            if graph.is_undirected_from_to(node, &other)? {
                out.push(other);
            }
        }
        Ok(out)
    }

    fn try_orient(&self, graph: &mut Graph, from: &Node, to: &Node, oriented: &mut Vec<Edge>) -> Result<bool, GraphError> {
        if !graph.is_undirected_from_to(from, to)? {
            return Ok(false);
        }
        if let Some(k) = self.knowledge {
            if k.is_forbidden(from, to) || k.is_required(to, from) {
                return Ok(false);
            }
        }
        if self.aggressively_prevent_cycles && graph.would_create_cycle(from, to)? {
            return Ok(false);
        }
        graph.orient(from, to)?;
        oriented.push(Edge::directed(from, to));
        Ok(true)
    }

    /// a --> b --- c, a and c nonadjacent: b --> c.
    fn rule1(&self, graph: &mut Graph, b: &Node, oriented: &mut Vec<Edge>) -> Result<(), GraphError> {
        for a in graph.parents(b)? {
            for c in Self::undirected_neighbors(graph, b)? {
                if c == a || graph.is_adjacent(&a, &c)? || graph.is_ambiguous_triple(&a, b, &c) {
                    continue;
                }
                self.try_orient(graph, b, &c, oriented)?;
            }
        }
        Ok(())
    }

    /// a --> b --> c and a --- c: a --> c.
    fn rule2(&self, graph: &mut Graph, b: &Node, oriented: &mut Vec<Edge>) -> Result<(), GraphError> {
        for a in graph.parents(b)? {
            for c in graph.children(b)? {
                if c != a && graph.is_undirected_from_to(&a, &c)? {
                    self.try_orient(graph, &a, &c, oriented)?;
                }
            }
        }
        Ok(())
    }

    /// a --- b, a --- c --> b, a --- d --> b, c and d nonadjacent: a --> b.
    fn rule3(&self, graph: &mut Graph, b: &Node, oriented: &mut Vec<Edge>) -> Result<(), GraphError> {
        let parents = graph.parents(b)?;
        if parents.len() < 2 {
            return Ok(());
        }
        for a in Self::undirected_neighbors(graph, b)? {
            let mut fired = false;
            for (i, c) in parents.iter().enumerate() {
                for d in &parents[i + 1..] {
                    if graph.is_adjacent(c, d)?
                        || !graph.is_undirected_from_to(&a, c)?
                        || !graph.is_undirected_from_to(&a, d)?
                        || graph.is_ambiguous_triple(c, &a, d)
                    {
                        continue;
                    }
                    fired = self.try_orient(graph, &a, b, oriented)?;
                    if fired {
                        break;
                    }
                }
                if fired {
                    break;
                }
            }
        }
        Ok(())
    }

    /// a --- b, c --> d --> b, a adjacent to c and d, c and b nonadjacent: a --> b.
    fn rule4(&self, graph: &mut Graph, b: &Node, oriented: &mut Vec<Edge>) -> Result<(), GraphError> {
        for a in Self::undirected_neighbors(graph, b)? {
            'search: for d in graph.parents(b)? {
                if d == a || !graph.is_adjacent(&a, &d)? {
                    continue;
                }
                for c in graph.parents(&d)? {
                    if c == a || c == *b || graph.is_adjacent(&c, b)? || !graph.is_undirected_from_to(&a, &c)? {
                        continue;
                    }
                    if self.try_orient(graph, &a, b, oriented)? {
                        break 'search;
                    }
                }
            }
        }
        Ok(())
    }
}
