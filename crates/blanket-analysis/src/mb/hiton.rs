//! HITON-MB.
//!
//! HITON-PC admits the target's associates one at a time, strongest first, and after each
//! admission eliminates any candidate that some subset of the others screens off. The
//! blanket is PC(T) plus spouses found through each PC member. The symmetric variant keeps
//! X in PC(T) only when T is in PC(X).

use std::sync::Arc;

use tracing::debug;

use blanket_core::errors::SearchError;
use blanket_core::types::collections::FxHashMap;
use blanket_core::Depth;

use super::phases::{blanket_from_pc, find_separator, rank_by_association, PcSource};
use super::sepset::SepsetMap;
use super::session::TestSession;
use super::SearchOptions;
use crate::graph::Node;
use crate::indtest::IndependenceTest;

pub struct HitonMb {
    session: TestSession,
    depth: Depth,
    symmetric: bool,
    sepsets: SepsetMap,
    raw_pc: FxHashMap<Node, Vec<Node>>,
}

impl HitonMb {
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
            "HITON-MB-SYM"
        } else {
            "HITON-MB"
        }
    }

    /// HITON-PC without the symmetry check, memoized per search.
    fn hiton_pc(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        if let Some(pc) = self.raw_pc.get(target) {
            return Ok(pc.clone());
        }
        let variables = self.session.variables();
        let others: Vec<Node> = variables.into_iter().filter(|v| v != target).collect();

        let mut open = Vec::new();
        for (v, result) in rank_by_association(&mut self.session, target, &others, &[])? {
            if self.session.decide(&result, target, &v, &[])? {
                self.sepsets.set(target, &v, Vec::new());
            } else {
                open.push(v);
            }
        }

        let mut cpc: Vec<Node> = Vec::new();
        for v in open {
            cpc.push(v);
            for x in cpc.clone() {
                let rest: Vec<Node> = cpc.iter().filter(|n| **n != x).cloned().collect();
                if let Some(sep) = find_separator(&mut self.session, target, &x, &rest, self.depth)? {
                    self.sepsets.set(target, &x, sep);
                    cpc.retain(|n| *n != x);
                }
            }
        }
        debug!(target_node = %target, size = cpc.len(), "HITON-PC finished");
        self.raw_pc.insert(target.clone(), cpc.clone());
        Ok(cpc)
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        self.sepsets.clear();
        self.raw_pc.clear();
        blanket_from_pc(self, target)
    }
}

impl PcSource for HitonMb {
    fn session(&mut self) -> &mut TestSession {
        &mut self.session
    }

    fn depth(&self) -> Depth {
        self.depth
    }

    fn pc_of(&mut self, node: &Node) -> Result<Vec<Node>, SearchError> {
        let pc = self.hiton_pc(node)?;
        if !self.symmetric {
            return Ok(pc);
        }
        let mut kept = Vec::with_capacity(pc.len());
        for x in pc {
            if self.hiton_pc(&x)?.contains(node) {
                kept.push(x);
            }
        }
        Ok(kept)
    }

    fn sepsets(&self) -> &SepsetMap {
        &self.sepsets
    }
}

impl_mb_search!(HitonMb);
