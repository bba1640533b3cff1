//! Mbfs: Markov blanket fan search.
//!
//! Builds an undirected skeleton around the target out of "fans" (a node's associates,
//! pruned by subsets of its adjacents), orients it conservatively, and trims the pattern
//! to the target's blanket. The steps:
//!
//! 1. Fan the target.
//! 2. Fan each adjacent v of the target. For each w adjacent to v that is not yet fanned
//!    and touches at most one fanned node, drop v - w when some subset of adj(T) that
//!    contains v separates T from w. Such a w cannot be a spouse through v.
//! 3. Fan every node two links from the target.
//! 4. Apply knowledge, classify unshielded triples over the fanned nodes, and run the
//!    Meek rules.
//! 5. Trim to the target, its adjacents, and the parents of its children.
//! 6. Drop edges among the target's parents and among the parents of its children.

use std::sync::Arc;

use tracing::{debug, info, trace};

use blanket_core::errors::SearchError;
use blanket_core::types::collections::FxHashSet;
use blanket_core::Depth;

use super::orientation::{orient_unshielded_triples, TripleClassification};
use super::session::TestSession;
use super::utils::{trim_edges_among_parents, trim_edges_among_parents_of_children, trim_to_mb_nodes};
use super::SearchOptions;
use crate::combinatorics::{select, ChoiceGenerator, DepthChoiceGenerator};
use crate::graph::{Graph, Knowledge, MeekRules, Node, Triple};
use crate::indtest::IndependenceTest;

pub struct Mbfs {
    session: TestSession,
    depth: Depth,
    knowledge: Knowledge,
    aggressively_prevent_cycles: bool,
    target: Option<Node>,
    fanned: FxHashSet<Node>,
    triples: TripleClassification,
    result: Option<Graph>,
}

impl Mbfs {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
            depth: options.depth,
            knowledge: Knowledge::new(),
            aggressively_prevent_cycles: false,
            target: None,
            fanned: FxHashSet::default(),
            triples: TripleClassification::default(),
            result: None,
        }
    }

    pub fn with_knowledge(mut self, knowledge: Knowledge) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn set_knowledge(&mut self, knowledge: Knowledge) {
        self.knowledge = knowledge;
    }

    pub fn knowledge(&self) -> &Knowledge {
        &self.knowledge
    }

    pub fn set_aggressively_prevent_cycles(&mut self, enabled: bool) {
        self.aggressively_prevent_cycles = enabled;
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// Oriented Markov blanket pattern of the named target.
    pub fn search(&mut self, target: &str) -> Result<Graph, SearchError> {
        let target = self.session.resolve_target(target)?;
        self.session.begin();
        let result = self.mb_pattern(&target);
        let elapsed = self.session.finish();
        let graph = result?;
        info!(
            algorithm = "MBFS",
            target_node = %target,
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            tests = self.session.num_tests(),
            ?elapsed,
            "pattern search finished"
        );
        self.result = Some(graph.clone());
        Ok(graph)
    }

    /// Fans every variable and orients the whole skeleton. No node is ever dropped.
    pub fn search_all(&mut self) -> Result<Graph, SearchError> {
        self.session.begin();
        let result = self.full_pattern();
        let elapsed = self.session.finish();
        let graph = result?;
        info!(
            algorithm = "MBFS",
            nodes = graph.num_nodes(),
            edges = graph.num_edges(),
            tests = self.session.num_tests(),
            ?elapsed,
            "full search finished"
        );
        self.result = Some(graph.clone());
        Ok(graph)
    }

    /// Pattern from the most recent search.
    pub fn result_graph(&self) -> Option<&Graph> {
        self.result.as_ref()
    }

    pub fn colliders(&self) -> &[Triple] {
        &self.triples.colliders
    }

    pub fn noncolliders(&self) -> &[Triple] {
        &self.triples.noncolliders
    }

    pub fn ambiguous_triples(&self) -> &[Triple] {
        &self.triples.ambiguous
    }

    fn reset(&mut self, target: Option<&Node>) {
        self.target = target.cloned();
        self.fanned.clear();
        self.triples = TripleClassification::default();
        self.result = None;
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        let graph = self.mb_pattern(target)?;
        let blanket = graph.nodes().into_iter().filter(|n| n != target).collect();
        self.result = Some(graph);
        Ok(blanket)
    }

    fn mb_pattern(&mut self, target: &Node) -> Result<Graph, SearchError> {
        self.reset(Some(target));
        let variables = self.session.variables();
        let mut graph = Graph::new();
        graph.add_node(target.clone());

        self.construct_fan(&mut graph, target, &variables)?;
        debug!(target_node = %target, adjacents = graph.degree(target)?, "target fan built");

        for v in graph.adjacent_nodes(target)? {
            if !graph.contains_node(&v) {
                continue;
            }
            self.construct_fan(&mut graph, &v, &variables)?;
            self.prune_impossible_spouses(&mut graph, target, &v)?;
        }
        debug!(target_node = %target, nodes = graph.num_nodes(), "adjacent fans built");

        for v in graph.adjacent_nodes(target)? {
            for w in graph.adjacent_nodes(&v)? {
                if self.fanned.contains(&w) || !graph.contains_node(&w) {
                    continue;
                }
                self.construct_fan(&mut graph, &w, &variables)?;
            }
        }
        debug!(target_node = %target, nodes = graph.num_nodes(), fanned = self.fanned.len(), "second ring fans built");

        let mut centers: Vec<Node> = self.fanned.iter().cloned().collect();
        centers.sort();
        self.orient(&mut graph, &centers)?;

        trim_to_mb_nodes(&mut graph, target, false)?;
        trim_edges_among_parents(&mut graph, target)?;
        trim_edges_among_parents_of_children(&mut graph, target)?;
        trace!(target_node = %target, graph = %graph, "blanket pattern");
        Ok(graph)
    }

    fn full_pattern(&mut self) -> Result<Graph, SearchError> {
        self.reset(None);
        let variables = self.session.variables();
        let mut graph = Graph::with_nodes(variables.iter().cloned());
        for v in &variables {
            self.construct_fan(&mut graph, v, &variables)?;
        }
        self.orient(&mut graph, &variables)?;
        trace!(graph = %graph, "full pattern");
        Ok(graph)
    }

    fn orient(&mut self, graph: &mut Graph, centers: &[Node]) -> Result<(), SearchError> {
        self.knowledge.orient(graph)?;
        self.triples = orient_unshielded_triples(&mut self.session, graph, &self.knowledge, self.depth, centers)?;
        MeekRules::new()
            .with_knowledge(&self.knowledge)
            .aggressively_prevent_cycles(self.aggressively_prevent_cycles)
            .orient_implied(graph)?;
        Ok(())
    }

    fn construct_fan(&mut self, graph: &mut Graph, node: &Node, variables: &[Node]) -> Result<(), SearchError> {
        self.add_allowable_associates(graph, node, variables)?;
        self.prune(graph, node)
    }

    fn add_allowable_associates(&mut self, graph: &mut Graph, node: &Node, variables: &[Node]) -> Result<(), SearchError> {
        self.fanned.insert(node.clone());
        graph.add_node(node.clone());
        for w in variables {
            if self.fanned.contains(w) {
                continue;
            }
            if self.session.is_independent(node, w, &[])? || self.knowledge.is_forbidden_either_way(node, w) {
                continue;
            }
            graph.add_node(w.clone());
            graph.add_undirected_edge(node, w)?;
        }
        Ok(())
    }

    fn prune(&mut self, graph: &mut Graph, node: &Node) -> Result<(), SearchError> {
        let mut d = 1;
        while self.depth.allows(d) && graph.adjacent_nodes(node)?.len() >= d {
            for y in graph.adjacent_nodes(node)? {
                if !graph.contains_node(&y) || !graph.is_adjacent(node, &y)? {
                    continue;
                }
                let pool: Vec<Node> = graph.adjacent_nodes(node)?.into_iter().filter(|n| *n != y).collect();
                if pool.len() < d {
                    continue;
                }
                for choice in ChoiceGenerator::new(pool.len(), d) {
                    let given = select(&pool, &choice);
                    if self.session.is_independent(node, &y, &given)? && self.knowledge.no_edge_required(node, &y) {
                        graph.remove_edges_between(node, &y)?;
                        trace!(x = %node, y = %y, given = given.len(), "fan edge removed");
                        let orphan = graph.degree(&y)? == 0 && self.target.as_ref().is_some_and(|t| *t != y);
                        if orphan {
                            graph.remove_node(&y)?;
                        }
                        break;
                    }
                }
            }
            d += 1;
        }
        Ok(())
    }

    /// Step 2's prune: a subset of adj(T) containing `v` that separates T from `w`
    /// rules out the collider T -> v <- w.
    fn prune_impossible_spouses(&mut self, graph: &mut Graph, target: &Node, v: &Node) -> Result<(), SearchError> {
        for w in graph.adjacent_nodes(v)? {
            if self.fanned.contains(&w) || !graph.contains_node(&w) {
                continue;
            }
            let fanned_neighbors = graph
                .adjacent_nodes(&w)?
                .iter()
                .filter(|n| self.fanned.contains(*n))
                .count();
            if fanned_neighbors > 1 {
                continue;
            }
            let adj_t = graph.adjacent_nodes(target)?;
            let limit = self.depth.limit(adj_t.len());
            if limit == 0 || !adj_t.contains(v) {
                continue;
            }
            let others: Vec<Node> = adj_t.into_iter().filter(|n| n != v).collect();
            for choice in DepthChoiceGenerator::new(others.len(), limit - 1) {
                let mut given = select(&others, &choice);
                given.push(v.clone());
                if self.session.is_independent(target, &w, &given)? {
                    graph.remove_edges_between(v, &w)?;
                    trace!(v = %v, w = %w, "edge cannot carry a spouse");
                    break;
                }
            }
        }
        Ok(())
    }
}

impl_mb_search!(Mbfs, "MBFS");
