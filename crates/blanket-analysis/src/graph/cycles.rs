//! Directed cycle and directed path queries.

use std::collections::VecDeque;

use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use petgraph::stable_graph::NodeIndex;

use blanket_core::errors::GraphError;
use blanket_core::types::collections::{FxHashMap, FxHashSet};

use super::graph::Graph;
use super::node::Node;

impl Graph {
    /// Projection onto the directed edges, as a petgraph `DiGraph`.
    fn directed_projection(&self) -> DiGraph<NodeIndex, ()> {
        let mut dag = DiGraph::new();
        let mut map: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
        for idx in self.inner.node_indices() {
            map.insert(idx, dag.add_node(idx));
        }
        for idx in self.inner.node_indices() {
            for child in self.child_indices(idx) {
                dag.add_edge(map[&idx], map[&child], ());
            }
        }
        dag
    }

    pub fn exists_directed_cycle(&self) -> bool {
        let dag = self.directed_projection();
        toposort(&dag, None).is_err()
    }

    /// Fails with [`GraphError::Cycle`] naming a node on a directed cycle.
    pub fn ensure_acyclic(&self) -> Result<(), GraphError> {
        let dag = self.directed_projection();
        toposort(&dag, None).map(|_| ()).map_err(|cycle| GraphError::Cycle {
            name: self.node_at(dag[cycle.node_id()]).name().to_string(),
        })
    }

    /// Nodes in an order where every parent precedes its children.
    pub fn topological_order(&self) -> Result<Vec<Node>, GraphError> {
        let dag = self.directed_projection();
        let order = toposort(&dag, None).map_err(|cycle| GraphError::Cycle {
            name: self.node_at(dag[cycle.node_id()]).name().to_string(),
        })?;
        Ok(order.into_iter().map(|i| self.node_at(dag[i]).clone()).collect())
    }

    pub(crate) fn directed_path_exists(&self, from: NodeIndex, to: NodeIndex) -> bool {
        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            for child in self.child_indices(current) {
                if child == to {
                    return true;
                }
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
        false
    }

    /// Whether a directed path of length at least one leads from `from` to `to`.
    pub fn exists_directed_path(&self, from: &Node, to: &Node) -> Result<bool, GraphError> {
        let fi = self.index_of(from)?;
        let ti = self.index_of(to)?;
        Ok(self.directed_path_exists(fi, ti))
    }

    /// Whether orienting `from --> to` would close a directed cycle.
    pub fn would_create_cycle(&self, from: &Node, to: &Node) -> Result<bool, GraphError> {
        self.exists_directed_path(to, from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_cycles_after_mutation() {
        let mut g = Graph::from_spec("A-->B,B-->C").unwrap();
        assert!(!g.exists_directed_cycle());
        let (a, c) = (Node::new("A"), Node::new("C"));
        assert!(g.would_create_cycle(&c, &a).unwrap());
        g.add_directed_edge(&c, &a).unwrap();
        assert!(g.exists_directed_cycle());
        assert!(matches!(g.ensure_acyclic(), Err(GraphError::Cycle { .. })));
        g.remove_edges_between(&c, &a).unwrap();
        assert!(!g.exists_directed_cycle());
    }

    #[test]
    fn two_cycle_is_a_cycle() {
        let g = Graph::from_spec("A-->B,B-->A").unwrap();
        assert!(g.exists_directed_cycle());
    }

    #[test]
    fn undirected_edges_do_not_form_cycles() {
        let g = Graph::from_spec("A---B,B---C,C---A").unwrap();
        assert!(!g.exists_directed_cycle());
        assert_eq!(g.topological_order().unwrap().len(), 3);
    }
}
