//! Scoring an estimated graph against a true one.

use serde::{Deserialize, Serialize};

use blanket_core::types::collections::FxHashSet;

use super::graph::Graph;
use super::node::{Node, NodeEquality};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TwoCycleErrors {
    pub correct: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdjacencyErrors {
    pub correct: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

/// Name pairs `(a, b)`, `a < b`, joined by both `a --> b` and `b --> a`.
fn two_cycles(graph: &Graph) -> FxHashSet<(String, String)> {
    let mut out = FxHashSet::default();
    for edge in graph.edges() {
        let (a, b) = (edge.node1(), edge.node2());
        let both = graph.is_parent_of(a, b).unwrap_or(false) && graph.is_parent_of(b, a).unwrap_or(false);
        if both {
            out.insert(ordered(a, b));
        }
    }
    out
}

fn adjacencies(graph: &Graph) -> FxHashSet<(String, String)> {
    graph
        .edges()
        .iter()
        .map(|e| ordered(e.node1(), e.node2()))
        .collect()
}

fn ordered(a: &Node, b: &Node) -> (String, String) {
    if a.name() <= b.name() {
        (a.name().to_string(), b.name().to_string())
    } else {
        (b.name().to_string(), a.name().to_string())
    }
}

/// Keeps only pairs whose nodes in `from` have a counterpart in `reference` under `equality`.
fn matched(pairs: FxHashSet<(String, String)>, from: &Graph, reference: &Graph, equality: NodeEquality) -> FxHashSet<(String, String)> {
    let corresponds = |name: &str| match (from.node(name), reference.node(name)) {
        (Some(a), Some(b)) => a.matches(b, equality),
        _ => false,
    };
    pairs
        .into_iter()
        .filter(|(a, b)| corresponds(a) && corresponds(b))
        .collect()
}

/// Counts two-cycles found in both graphs, only in `estimated`, and only in `truth`.
pub fn two_cycle_errors(truth: &Graph, estimated: &Graph, equality: NodeEquality) -> TwoCycleErrors {
    let true_cycles = two_cycles(truth);
    let est_cycles = two_cycles(estimated);
    let matched_est = matched(est_cycles.clone(), estimated, truth, equality);
    let correct = matched_est.intersection(&true_cycles).count();
    TwoCycleErrors {
        correct,
        false_positives: est_cycles.len() - correct,
        false_negatives: true_cycles.len() - correct,
    }
}

pub fn adjacency_errors(truth: &Graph, estimated: &Graph, equality: NodeEquality) -> AdjacencyErrors {
    let true_adj = adjacencies(truth);
    let est_adj = adjacencies(estimated);
    let matched_est = matched(est_adj.clone(), estimated, truth, equality);
    let correct = matched_est.intersection(&true_adj).count();
    AdjacencyErrors {
        correct,
        false_positives: est_adj.len() - correct,
        false_negatives: true_adj.len() - correct,
    }
}
