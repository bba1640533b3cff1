//! IAMBnPC and InterIAMBnPC.
//!
//! Both grow a candidate blanket the IAMB way and then shrink it with a PC search confined
//! to the candidates plus the target. The blanket is read off the local pattern as the
//! target's adjacents plus the parents of its oriented children.

use std::sync::Arc;

use tracing::{debug, trace};

use blanket_core::errors::SearchError;
use blanket_core::types::collections::FxHashSet;
use blanket_core::Depth;

use super::iamb::{admit_best, grow};
use super::sepset::SepsetMap;
use super::session::TestSession;
use super::SearchOptions;
use crate::combinatorics::{select, ChoiceGenerator};
use crate::graph::{Endpoint, Graph, Node};
use crate::indtest::IndependenceTest;

/// PC adjacency search over `local` (which must contain `target`), collider orientation
/// from the recorded sepsets, then the blanket read off the target's neighborhood.
///
/// Pairs involving the target draw conditioning sets from the whole local set; other
/// pairs use the usual adjacency subsets.
pub(crate) fn local_pc_blanket(
    session: &mut TestSession,
    target: &Node,
    local: &[Node],
    depth: Depth,
) -> Result<Vec<Node>, SearchError> {
    let mut graph = Graph::with_nodes(local.iter().cloned());
    for (i, a) in local.iter().enumerate() {
        for b in &local[i + 1..] {
            graph.add_undirected_edge(a, b)?;
        }
    }
    let mut sepsets = SepsetMap::new();

    let mut d = 0;
    while depth.allows(d) {
        let mut more = false;
        for edge in graph.edges() {
            let (x, y) = (edge.node1().clone(), edge.node2().clone());
            if !graph.is_adjacent(&x, &y)? {
                continue;
            }
            let pools: Vec<(Node, Node, Vec<Node>)> = if x == *target || y == *target {
                let other = if x == *target { y.clone() } else { x.clone() };
                let pool = local.iter().filter(|n| *n != target && **n != other).cloned().collect();
                vec![(target.clone(), other, pool)]
            } else {
                let adj_x = graph.adjacent_nodes(&x)?.into_iter().filter(|n| *n != y).collect();
                let adj_y = graph.adjacent_nodes(&y)?.into_iter().filter(|n| *n != x).collect();
                vec![(x.clone(), y.clone(), adj_x), (y.clone(), x.clone(), adj_y)]
            };
            'pools: for (a, b, pool) in pools {
                if pool.len() < d {
                    continue;
                }
                more = true;
                for choice in ChoiceGenerator::new(pool.len(), d) {
                    let given = select(&pool, &choice);
                    if session.is_independent(&a, &b, &given)? {
                        graph.remove_edges_between(&a, &b)?;
                        trace!(x = %a, y = %b, given = given.len(), "local edge removed");
                        sepsets.set(&a, &b, given);
                        break 'pools;
                    }
                }
            }
        }
        if !more {
            break;
        }
        d += 1;
    }

    orient_colliders(&mut graph, &sepsets)?;
    read_blanket(&graph, target)
}

fn orient_colliders(graph: &mut Graph, sepsets: &SepsetMap) -> Result<(), SearchError> {
    for y in graph.nodes() {
        let adj = graph.adjacent_nodes(&y)?;
        for (i, x) in adj.iter().enumerate() {
            for z in &adj[i + 1..] {
                if graph.is_adjacent(x, z)? {
                    continue;
                }
                if let Some(sep) = sepsets.get(x, z) {
                    if !sep.contains(&y) {
                        graph.set_endpoint(x, &y, Endpoint::Arrow)?;
                        graph.set_endpoint(z, &y, Endpoint::Arrow)?;
                    }
                }
            }
        }
    }
    Ok(())
}

fn read_blanket(graph: &Graph, target: &Node) -> Result<Vec<Node>, SearchError> {
    let mut blanket = graph.adjacent_nodes(target)?;
    for child in graph.children(target)? {
        for parent in graph.parents(&child)? {
            if parent != *target && !blanket.contains(&parent) {
                blanket.push(parent);
            }
        }
    }
    Ok(blanket)
}

fn with_target(blanket: &[Node], target: &Node) -> Vec<Node> {
    let mut local = blanket.to_vec();
    local.push(target.clone());
    local
}

pub struct IambnPc {
    session: TestSession,
    depth: Depth,
}

impl IambnPc {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
            depth: options.depth,
        }
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        let variables = self.session.variables();
        let candidates = grow(&mut self.session, target, &variables)?;
        let blanket = local_pc_blanket(&mut self.session, target, &with_target(&candidates, target), self.depth)?;
        debug!(target_node = %target, candidates = candidates.len(), size = blanket.len(), "local PC shrink finished");
        Ok(blanket)
    }
}

pub struct InterIambnPc {
    session: TestSession,
    depth: Depth,
}

impl InterIambnPc {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
            depth: options.depth,
        }
    }

    /// Admits one variable at a time and reshapes the blanket with a local PC search after
    /// each admission. A variable the local search evicts is not offered again, so every
    /// variable is admitted at most once. Once nothing is left to admit, the blanket is grown
    /// until every outside variable is screened off and reshaped one final time.
    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        let variables = self.session.variables();
        let mut blanket: Vec<Node> = Vec::new();
        let mut evicted: FxHashSet<Node> = FxHashSet::default();
        loop {
            let eligible: Vec<Node> = variables.iter().filter(|v| !evicted.contains(*v)).cloned().collect();
            let before = blanket.clone();
            if !admit_best(&mut self.session, target, &eligible, &mut blanket)? {
                break;
            }
            let admitted = blanket.clone();
            blanket = local_pc_blanket(&mut self.session, target, &with_target(&blanket, target), self.depth)?;
            for v in admitted.into_iter().chain(before) {
                if !blanket.contains(&v) {
                    trace!(target_node = %target, evicted = %v, "local search evicted variable");
                    evicted.insert(v);
                }
            }
        }

        let interleaved = blanket.len();
        while admit_best(&mut self.session, target, &variables, &mut blanket)? {}
        if blanket.len() > interleaved {
            blanket = local_pc_blanket(&mut self.session, target, &with_target(&blanket, target), self.depth)?;
        }
        debug!(
            target_node = %target,
            size = blanket.len(),
            evicted = evicted.len(),
            tests = self.session.num_tests(),
            "interleaved search finished"
        );
        Ok(blanket)
    }
}

impl_mb_search!(IambnPc, "IAMBnPC");
impl_mb_search!(InterIambnPc, "InterIAMBnPC");
