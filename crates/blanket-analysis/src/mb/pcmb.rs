//! PCMB.
//!
//! GetPCD alternates three steps until no candidates remain: drop candidates screened off
//! by subsets of the current PCD, admit the candidate whose weakest association is
//! strongest, and drop PCD members screened off by the others. GetPC keeps X only when
//! T is also in PCD(X). Spouses come from the shared spouse phase.

use std::sync::Arc;

use tracing::debug;

use blanket_core::errors::SearchError;
use blanket_core::types::collections::FxHashMap;
use blanket_core::Depth;

use super::phases::{association_order, blanket_from_pc, find_separator, PcSource};
use super::sepset::SepsetMap;
use super::session::TestSession;
use super::SearchOptions;
use crate::combinatorics::{select, DepthChoiceGenerator};
use crate::graph::Node;
use crate::indtest::{IndependenceResult, IndependenceTest};

pub struct Pcmb {
    session: TestSession,
    depth: Depth,
    sepsets: SepsetMap,
    pcd: FxHashMap<Node, Vec<Node>>,
}

impl Pcmb {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
            depth: options.depth,
            sepsets: SepsetMap::new(),
            pcd: FxHashMap::default(),
        }
    }

    fn get_pcd(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        if let Some(pcd) = self.pcd.get(target) {
            return Ok(pcd.clone());
        }
        let mut candidates: Vec<Node> = self.session.variables().into_iter().filter(|v| v != target).collect();
        let mut pcd: Vec<Node> = Vec::new();

        while !candidates.is_empty() {
            let mut weakest: Vec<(Node, IndependenceResult)> = Vec::with_capacity(candidates.len());
            for x in candidates.clone() {
                match self.weakest_association(target, &x, &pcd)? {
                    Some(result) => weakest.push((x, result)),
                    None => candidates.retain(|c| *c != x),
                }
            }

            let best = weakest
                .into_iter()
                .min_by(|a, b| association_order(&a.1, &b.1).then_with(|| a.0.cmp(&b.0)));
            let Some((best, _)) = best else {
                break;
            };
            candidates.retain(|c| *c != best);
            pcd.push(best);

            for x in pcd.clone() {
                let rest: Vec<Node> = pcd.iter().filter(|n| **n != x).cloned().collect();
                if let Some(sep) = find_separator(&mut self.session, target, &x, &rest, self.depth)? {
                    self.sepsets.set(target, &x, sep);
                    pcd.retain(|n| *n != x);
                }
            }
        }
        debug!(target_node = %target, size = pcd.len(), "GetPCD finished");
        self.pcd.insert(target.clone(), pcd.clone());
        Ok(pcd)
    }

    /// Weakest association of `x` with the target over subsets of `pcd`, or `None` (with
    /// the sepset recorded) when some subset screens it off.
    fn weakest_association(&mut self, target: &Node, x: &Node, pcd: &[Node]) -> Result<Option<IndependenceResult>, SearchError> {
        let mut weakest: Option<IndependenceResult> = None;
        for choice in DepthChoiceGenerator::new(pcd.len(), self.depth.limit(pcd.len())) {
            let given = select(pcd, &choice);
            let result = self.session.check(target, x, &given)?;
            if self.session.decide(&result, target, x, &given)? {
                self.sepsets.set(target, x, given);
                return Ok(None);
            }
            weakest = match weakest {
                Some(prev) if association_order(&result, &prev).is_le() => Some(prev),
                _ => Some(result),
            };
        }
        Ok(weakest)
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        self.sepsets.clear();
        self.pcd.clear();
        blanket_from_pc(self, target)
    }
}

impl PcSource for Pcmb {
    fn session(&mut self) -> &mut TestSession {
        &mut self.session
    }

    fn depth(&self) -> Depth {
        self.depth
    }

    /// GetPC: PCD members that list the target in their own PCD.
    fn pc_of(&mut self, node: &Node) -> Result<Vec<Node>, SearchError> {
        let pcd = self.get_pcd(node)?;
        let mut pc = Vec::with_capacity(pcd.len());
        for x in pcd {
            if self.get_pcd(&x)?.contains(node) {
                pc.push(x);
            }
        }
        Ok(pc)
    }

    fn sepsets(&self) -> &SepsetMap {
        &self.sepsets
    }
}

impl_mb_search!(Pcmb, "PCMB");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{node_names, Graph};
    use crate::indtest::DSeparationTest;
    use crate::mb::MbSearch;

    fn oracle(spec: &str) -> Arc<dyn IndependenceTest> {
        Arc::new(DSeparationTest::new(Graph::from_spec(spec).unwrap()))
    }

    #[test]
    fn pcd_may_hold_descendants_that_get_pc_removes() {
        let mut pcmb = Pcmb::new(oracle("T-->C,W-->C,C-->X,W-->X"), SearchOptions::default());
        pcmb.session.begin();
        let t = Node::new("T");
        assert_eq!(node_names(&pcmb.get_pcd(&t).unwrap()), vec!["C", "X"]);
        assert_eq!(node_names(&pcmb.pc_of(&t).unwrap()), vec!["C"]);
    }

    #[test]
    fn finds_blanket_with_spouse() {
        let mut pcmb = Pcmb::new(oracle("T-->C,W-->C,C-->X,W-->X,P-->T"), SearchOptions::default());
        assert_eq!(node_names(&pcmb.find_mb("T").unwrap()), vec!["C", "P", "W"]);
    }
}
