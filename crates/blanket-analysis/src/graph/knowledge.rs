//! Background knowledge: forbidden and required directed edges.

use serde::{Deserialize, Serialize};

use blanket_core::errors::GraphError;
use blanket_core::types::collections::FxHashSet;

use super::graph::Graph;
use super::node::Node;

/// Forbidden and required `from --> to` edges, keyed by node name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Knowledge {
    forbidden: FxHashSet<(String, String)>,
    required: FxHashSet<(String, String)>,
}

impl Knowledge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.forbidden.is_empty() && self.required.is_empty()
    }

    pub fn set_forbidden(&mut self, from: &str, to: &str) {
        self.forbidden.insert((from.to_string(), to.to_string()));
    }

    pub fn set_required(&mut self, from: &str, to: &str) {
        self.required.insert((from.to_string(), to.to_string()));
    }

    pub fn is_forbidden(&self, from: &Node, to: &Node) -> bool {
        self.forbidden
            .contains(&(from.name().to_string(), to.name().to_string()))
    }

    pub fn is_required(&self, from: &Node, to: &Node) -> bool {
        self.required
            .contains(&(from.name().to_string(), to.name().to_string()))
    }

    /// Neither direction may carry an edge.
    pub fn is_forbidden_either_way(&self, a: &Node, b: &Node) -> bool {
        self.is_forbidden(a, b) && self.is_forbidden(b, a)
    }

    pub fn no_edge_required(&self, a: &Node, b: &Node) -> bool {
        !self.is_required(a, b) && !self.is_required(b, a)
    }

    /// Orients adjacent pairs as required edges dictate, and reverses forbidden directions
    /// on undirected edges. Returns the number of edges changed.
    pub fn orient(&self, graph: &mut Graph) -> Result<usize, GraphError> {
        let mut changed = 0;
        let mut forbidden: Vec<&(String, String)> = self.forbidden.iter().collect();
        forbidden.sort();
        for (from, to) in forbidden {
            let (Some(a), Some(b)) = (graph.node(from).cloned(), graph.node(to).cloned()) else {
                continue;
            };
            if graph.is_undirected_from_to(&a, &b)? {
                graph.orient(&b, &a)?;
                changed += 1;
            }
        }
        let mut required: Vec<&(String, String)> = self.required.iter().collect();
        required.sort();
        for (from, to) in required {
            let (Some(a), Some(b)) = (graph.node(from).cloned(), graph.node(to).cloned()) else {
                continue;
            };
            if graph.is_adjacent(&a, &b)? && !graph.is_parent_of(&a, &b)? {
                graph.orient(&a, &b)?;
                changed += 1;
            }
        }
        if changed > 0 {
            tracing::debug!(changed, "oriented edges from background knowledge");
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_and_forbidden_orientations() {
        let mut g = Graph::from_spec("A---B,B---C").unwrap();
        let mut k = Knowledge::new();
        k.set_required("A", "B");
        k.set_forbidden("B", "C");
        assert_eq!(k.orient(&mut g).unwrap(), 2);
        let (a, b, c) = (Node::new("A"), Node::new("B"), Node::new("C"));
        assert!(g.is_parent_of(&a, &b).unwrap());
        assert!(g.is_parent_of(&c, &b).unwrap());
    }
}
