//! Post-processing of Markov blanket patterns: trimming to blanket nodes and enumerating
//! the DAGs a pattern stands for.

use std::sync::Arc;

use tracing::debug;

use blanket_core::errors::{GraphError, SearchError};
use blanket_core::types::collections::FxHashSet;
use blanket_core::{CancelToken, Depth};

use super::orientation::orient_unshielded_triples;
use super::session::TestSession;
use crate::combinatorics::CombinationIterator;
use crate::graph::{Edge, Graph, Knowledge, MeekRules, Node};
use crate::indtest::IndependenceTest;

/// Removes every node except the target, its adjacents, and the parents of nodes the
/// target points into.
///
/// With `include_bidirected`, `T <-> c` makes `c` a child and `w <-> c` makes `w` a parent.
pub fn trim_to_mb_nodes(graph: &mut Graph, target: &Node, include_bidirected: bool) -> Result<(), GraphError> {
    let adjacents = graph.adjacent_nodes(target)?;
    let joined = |graph: &Graph, from: &Node, to: &Node| -> Result<bool, GraphError> {
        Ok(graph.is_directed_from_to(from, to)? || (include_bidirected && graph.is_bidirected_between(from, to)?))
    };

    let mut keep: FxHashSet<Node> = adjacents.iter().cloned().collect();
    keep.insert(target.clone());
    for child in &adjacents {
        if !joined(graph, target, child)? {
            continue;
        }
        for w in graph.adjacent_nodes(child)? {
            if w != *target && joined(graph, &w, child)? {
                keep.insert(w);
            }
        }
    }

    let doomed: Vec<Node> = graph.nodes().into_iter().filter(|n| !keep.contains(n)).collect();
    if !doomed.is_empty() {
        debug!(target_node = %target, removed = doomed.len(), "trimmed to blanket nodes");
    }
    graph.remove_nodes(&doomed)
}

/// Removes every edge joining two parents of the target. Returns the number removed.
pub fn trim_edges_among_parents(graph: &mut Graph, target: &Node) -> Result<usize, GraphError> {
    let parents = graph.parents(target)?;
    remove_edges_among(graph, &parents)
}

/// Removes every edge joining two parents of the target's children, not counting the
/// target or its adjacents. Returns the number removed.
pub fn trim_edges_among_parents_of_children(graph: &mut Graph, target: &Node) -> Result<usize, GraphError> {
    let adjacents = graph.adjacent_nodes(target)?;
    let mut spouses: Vec<Node> = Vec::new();
    for child in graph.children(target)? {
        for parent in graph.parents(&child)? {
            if parent != *target && !adjacents.contains(&parent) && !spouses.contains(&parent) {
                spouses.push(parent);
            }
        }
    }
    remove_edges_among(graph, &spouses)
}

fn remove_edges_among(graph: &mut Graph, nodes: &[Node]) -> Result<usize, GraphError> {
    let mut removed = 0;
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            removed += graph.remove_edges_between(a, b)?;
        }
    }
    Ok(removed)
}

/// DAGs obtained by orienting a Markov blanket pattern.
///
/// Colliders around the target are oriented from separators found with `test`, then the
/// Meek rules run. Each remaining undirected edge (and each bidirected edge when
/// `orient_bidirected` is set) is tried in both directions. Cyclic results are dropped and
/// duplicates collapsed.
pub fn generate_mb_dags(
    pattern: &Graph,
    orient_bidirected: bool,
    test: Arc<dyn IndependenceTest>,
    depth: Depth,
    target: &Node,
) -> Result<Vec<Graph>, SearchError> {
    let mut graph = pattern.clone();
    let mut session = TestSession::new(test, Default::default(), CancelToken::new());
    session.begin();

    let mut centers = vec![target.clone()];
    centers.extend(graph.adjacent_nodes(target)?);
    let knowledge = Knowledge::new();
    orient_unshielded_triples(&mut session, &mut graph, &knowledge, depth, &centers)?;
    MeekRules::new().orient_implied(&mut graph)?;

    let open: Vec<Edge> = graph
        .edges()
        .into_iter()
        .filter(|e| e.is_undirected() || (orient_bidirected && e.is_bidirected()))
        .collect();

    let mut dags: Vec<Graph> = Vec::new();
    for combination in CombinationIterator::new(&vec![2; open.len()]) {
        let mut dag = graph.clone();
        for (edge, &choice) in open.iter().zip(&combination) {
            if choice == 0 {
                dag.orient(edge.node1(), edge.node2())?;
            } else {
                dag.orient(edge.node2(), edge.node1())?;
            }
        }
        MeekRules::new().orient_implied(&mut dag)?;
        if dag.exists_directed_cycle() || dags.contains(&dag) {
            continue;
        }
        dags.push(dag);
    }
    session.finish();
    debug!(target_node = %target, open_edges = open.len(), dags = dags.len(), "blanket DAGs enumerated");
    Ok(dags)
}
