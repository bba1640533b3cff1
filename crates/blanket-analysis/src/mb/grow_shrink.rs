//! Grow-Shrink.
//!
//! Grow: every round tests each outside variable given the current blanket and admits the
//! most strongly dependent one. Shrink: one pass dropping members independent of the target
//! given the rest.

use std::sync::Arc;

use tracing::debug;

use blanket_core::errors::SearchError;

use super::phases::association_order;
use super::session::TestSession;
use super::SearchOptions;
use crate::graph::Node;
use crate::indtest::IndependenceTest;

pub struct GrowShrink {
    session: TestSession,
}

impl GrowShrink {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
        }
    }

    fn grow(&mut self, target: &Node, variables: &[Node]) -> Result<Vec<Node>, SearchError> {
        let mut blanket: Vec<Node> = Vec::new();
        loop {
            let mut best = None;
            for v in variables {
                if v == target || blanket.contains(v) {
                    continue;
                }
                let result = self.session.check(target, v, &blanket)?;
                if self.session.decide(&result, target, v, &blanket)? {
                    continue;
                }
                let replace = match &best {
                    None => true,
                    Some((_, incumbent)) => association_order(&result, incumbent).is_lt(),
                };
                if replace {
                    best = Some((v.clone(), result));
                }
            }
            match best {
                Some((v, _)) => blanket.push(v),
                None => break,
            }
        }
        debug!(target_node = %target, size = blanket.len(), tests = self.session.num_tests(), "grow phase finished");
        Ok(blanket)
    }

    fn shrink(&mut self, target: &Node, mut blanket: Vec<Node>) -> Result<Vec<Node>, SearchError> {
        for v in blanket.clone() {
            let rest: Vec<Node> = blanket.iter().filter(|n| **n != v).cloned().collect();
            if self.session.is_independent(target, &v, &rest)? {
                blanket.retain(|n| *n != v);
            }
        }
        debug!(target_node = %target, size = blanket.len(), "shrink phase finished");
        Ok(blanket)
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        let variables = self.session.variables();
        let grown = self.grow(target, &variables)?;
        self.shrink(target, grown)
    }
}

impl_mb_search!(GrowShrink, "GS");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{node_names, Graph};
    use crate::mb::MbSearch;
    use crate::indtest::DSeparationTest;

    #[test]
    fn recovers_collider_blanket() {
        let g = Graph::from_spec("P1-->T,P2-->T,T-->C,S-->C,C-->D,U-->P1").unwrap();
        let mut gs = GrowShrink::new(Arc::new(DSeparationTest::new(g)), SearchOptions::default());
        let mb = gs.find_mb("T").unwrap();
        assert_eq!(node_names(&mb), vec!["C", "P1", "P2", "S"]);
        assert!(gs.num_independence_tests() > 0);
    }
}
