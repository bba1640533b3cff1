//! Property-based tests for graph invariants.
//!
//! Over random DAGs:
//! 1. d-connection is symmetric and is the complement of d-separation.
//! 2. Adding an existing edge changes nothing.
//! 3. Removing a node never leaves a triple that references it or lost an adjacency.
//! 4. Grow-shrink over the d-separation oracle returns the true blanket.

use std::sync::Arc;

use proptest::prelude::*;

use blanket_analysis::graph::{markov_blanket, node_names, Graph, Node};
use blanket_analysis::indtest::DSeparationTest;
use blanket_analysis::mb::{GrowShrink, MbSearch, SearchOptions};
use blanket_core::Depth;

// =============================================================================
// Strategy helpers
// =============================================================================

/// A DAG over `X0..Xn` with edges only from lower to higher index, plus a subset mask.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = (Graph, Vec<bool>)> {
    (2..=max_nodes).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<bool>(), n * (n - 1) / 2),
            prop::collection::vec(any::<bool>(), n),
        )
            .prop_map(move |(edges, mask)| (build_dag(n, &edges), mask))
    })
}

fn build_dag(n: usize, edges: &[bool]) -> Graph {
    let nodes: Vec<Node> = (0..n).map(|i| Node::new(format!("X{i}"))).collect();
    let mut graph = Graph::with_nodes(nodes.iter().cloned());
    let mut k = 0;
    for i in 0..n {
        for j in i + 1..n {
            if edges[k] {
                graph.add_directed_edge(&nodes[i], &nodes[j]).unwrap();
            }
            k += 1;
        }
    }
    graph
}

fn masked(nodes: &[Node], mask: &[bool]) -> Vec<Node> {
    nodes.iter().zip(mask).filter(|(_, m)| **m).map(|(n, _)| n.clone()).collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn d_connection_is_symmetric((graph, mask) in dag_strategy(7)) {
        let nodes = graph.nodes();
        let z = masked(&nodes, &mask);
        for x in &nodes {
            for y in &nodes {
                let forward = graph.is_d_connected_to(x, y, &z).unwrap();
                prop_assert_eq!(forward, graph.is_d_connected_to(y, x, &z).unwrap());
                prop_assert_eq!(forward, !graph.is_d_separated_from(x, y, &z).unwrap());
            }
        }
    }

    #[test]
    fn adding_an_edge_twice_is_a_no_op((graph, _mask) in dag_strategy(7)) {
        let mut graph = graph;
        for edge in graph.edges() {
            let before = graph.num_edges();
            prop_assert!(!graph.add_edge(edge.clone()).unwrap());
            prop_assert_eq!(graph.num_edges(), before);
        }
    }

    #[test]
    fn node_removal_prunes_triples((graph, mask) in dag_strategy(7)) {
        let mut graph = graph.undirected_copy();
        let nodes = graph.nodes();
        for y in &nodes {
            let adj = graph.adjacent_nodes(y).unwrap();
            for (i, x) in adj.iter().enumerate() {
                for z in &adj[i + 1..] {
                    graph.add_ambiguous_triple(x, y, z).unwrap();
                }
            }
        }
        let doomed = masked(&nodes, &mask);
        graph.remove_nodes(&doomed).unwrap();

        for t in graph.ambiguous_triples() {
            prop_assert!(!doomed.iter().any(|d| t.contains(d)));
            prop_assert!(graph.is_adjacent(&t.x, &t.y).unwrap());
            prop_assert!(graph.is_adjacent(&t.z, &t.y).unwrap());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn grow_shrink_recovers_blanket_from_oracle((graph, _mask) in dag_strategy(6)) {
        let test = Arc::new(DSeparationTest::new(graph.clone()));
        let options = SearchOptions::default().with_depth(Depth::Unbounded);
        for target in graph.nodes() {
            let mut search = GrowShrink::new(test.clone(), options.clone());
            let found = search.find_mb(target.name()).unwrap();
            let truth = markov_blanket(&graph, &target).unwrap();
            prop_assert_eq!(node_names(&found), node_names(&truth));
        }
    }
}
