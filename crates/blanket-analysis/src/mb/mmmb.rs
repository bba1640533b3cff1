//! MMMB: max-min parents and children, then the spouse phase.
//!
//! The forward phase keeps, for every outside variable, its weakest association with the
//! target over subsets of the current candidates, and admits the variable whose weakest
//! association is strongest. A variable screened off along the way is dropped for good.
//! The backward phase removes candidates screened off by subsets of the others.

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

pub struct Mmmb {
    session: TestSession,
    depth: Depth,
    symmetric: bool,
    sepsets: SepsetMap,
    raw_pc: FxHashMap<Node, Vec<Node>>,
}

impl Mmmb {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
            depth: options.depth,
            symmetric: false,
            sepsets: SepsetMap::new(),
            raw_pc: FxHashMap::default(),
        }
    }

    pub fn symmetric(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            symmetric: true,
            ..Self::new(test, options)
        }
    }

    fn label(&self) -> &'static str {
        if self.symmetric {
            "MMMB-SYM"
        } else {
            "MMMB"
        }
    }

    fn mmpc(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        if let Some(pc) = self.raw_pc.get(target) {
            return Ok(pc.clone());
        }
        let mut remaining: Vec<Node> = self.session.variables().into_iter().filter(|v| v != target).collect();
        let mut weakest: FxHashMap<Node, IndependenceResult> = FxHashMap::default();
        let mut cpc: Vec<Node> = Vec::new();

        loop {
            // Only subsets that contain the newest member are new since the last round.
            let newest = cpc.last().cloned();
            let older: Vec<Node> = match &newest {
                Some(n) => cpc.iter().filter(|c| *c != n).cloned().collect(),
                None => Vec::new(),
            };
            // At depth zero only the first round conditions on anything new.
            let older_limit = match newest {
                Some(_) if self.depth.allows(1) => Some(self.depth.limit(older.len() + 1) - 1),
                Some(_) => None,
                None => Some(0),
            };

            let mut screened = Vec::new();
            if let Some(limit) = older_limit {
                for x in &remaining {
                    for choice in DepthChoiceGenerator::new(older.len(), limit) {
                        let mut given = select(&older, &choice);
                        given.extend(newest.iter().cloned());
                        let result = self.session.check(target, x, &given)?;
                        if self.session.decide(&result, target, x, &given)? {
                            self.sepsets.set(target, x, given);
                            screened.push(x.clone());
                            break;
                        }
                        let weaker = match weakest.get(x) {
                            None => true,
                            Some(prev) => association_order(&result, prev).is_gt(),
                        };
                        if weaker {
                            weakest.insert(x.clone(), result);
                        }
                    }
                }
            }
            remaining.retain(|x| !screened.contains(x));

            let best = remaining
                .iter()
                .filter_map(|x| weakest.get(x).map(|r| (x, r)))
                .min_by(|a, b| association_order(a.1, b.1).then_with(|| a.0.cmp(b.0)))
                .map(|(x, _)| x.clone());
            match best {
                Some(x) => {
                    remaining.retain(|r| *r != x);
                    cpc.push(x);
                }
                None => break,
            }
        }
        debug!(target_node = %target, size = cpc.len(), "MMPC forward phase finished");

        for x in cpc.clone() {
            let rest: Vec<Node> = cpc.iter().filter(|n| **n != x).cloned().collect();
            if let Some(sep) = find_separator(&mut self.session, target, &x, &rest, self.depth)? {
                self.sepsets.set(target, &x, sep);
                cpc.retain(|n| *n != x);
            }
        }
        debug!(target_node = %target, size = cpc.len(), "MMPC backward phase finished");
        self.raw_pc.insert(target.clone(), cpc.clone());
        Ok(cpc)
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        self.sepsets.clear();
        self.raw_pc.clear();
        blanket_from_pc(self, target)
    }
}

impl PcSource for Mmmb {
    fn session(&mut self) -> &mut TestSession {
        &mut self.session
    }

    fn depth(&self) -> Depth {
        self.depth
    }

    fn pc_of(&mut self, node: &Node) -> Result<Vec<Node>, SearchError> {
        let pc = self.mmpc(node)?;
        if !self.symmetric {
            return Ok(pc);
        }
        let mut kept = Vec::with_capacity(pc.len());
        for x in pc {
            if self.mmpc(&x)?.contains(node) {
                kept.push(x);
            }
        }
        Ok(kept)
    }

    fn sepsets(&self) -> &SepsetMap {
        &self.sepsets
    }
}

impl_mb_search!(Mmmb);
