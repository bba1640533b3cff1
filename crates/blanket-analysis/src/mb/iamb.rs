//! IAMB and InterIAMB.
//!
//! IAMB ranks the outside variables by association given the current blanket and admits
//! only the top one, if dependent. InterIAMB interleaves a shrink pass after every admission.

use std::sync::Arc;

use tracing::debug;

use blanket_core::errors::SearchError;
use blanket_core::types::collections::FxHashSet;

use super::phases::rank_by_association;
use super::session::TestSession;
use super::SearchOptions;
use crate::graph::{node_names, Node};
use crate::indtest::IndependenceTest;

/// Admits the best-ranked outside variable if it is dependent on the target.
/// Returns false when nothing was admitted.
pub(crate) fn admit_best(
    session: &mut TestSession,
    target: &Node,
    variables: &[Node],
    blanket: &mut Vec<Node>,
) -> Result<bool, SearchError> {
    let outside: Vec<Node> = variables
        .iter()
        .filter(|v| *v != target && !blanket.contains(v))
        .cloned()
        .collect();
    if outside.is_empty() {
        return Ok(false);
    }
    let ranked = rank_by_association(session, target, &outside, blanket)?;
    let Some((best, result)) = ranked.into_iter().next() else {
        return Ok(false);
    };
    if session.decide(&result, target, &best, blanket)? {
        return Ok(false);
    }
    blanket.push(best);
    Ok(true)
}

/// One pass removing members independent of the target given the others.
/// Returns true when anything was removed.
pub(crate) fn shrink_pass(session: &mut TestSession, target: &Node, blanket: &mut Vec<Node>) -> Result<bool, SearchError> {
    let mut changed = false;
    for v in blanket.clone() {
        let rest: Vec<Node> = blanket.iter().filter(|n| **n != v).cloned().collect();
        if session.is_independent(target, &v, &rest)? {
            blanket.retain(|n| *n != v);
            changed = true;
        }
    }
    Ok(changed)
}

/// IAMB growing phase.
pub(crate) fn grow(session: &mut TestSession, target: &Node, variables: &[Node]) -> Result<Vec<Node>, SearchError> {
    let mut blanket = Vec::new();
    while admit_best(session, target, variables, &mut blanket)? {}
    debug!(target_node = %target, size = blanket.len(), tests = session.num_tests(), "grow phase finished");
    Ok(blanket)
}

pub struct Iamb {
    session: TestSession,
}

impl Iamb {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
        }
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        let variables = self.session.variables();
        let mut blanket = grow(&mut self.session, target, &variables)?;
        while shrink_pass(&mut self.session, target, &mut blanket)? {}
        debug!(target_node = %target, size = blanket.len(), "shrink phase finished");
        Ok(blanket)
    }
}

pub struct InterIamb {
    session: TestSession,
}

impl InterIamb {
    pub fn new(test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Self {
        Self {
            session: options.session(test),
        }
    }

    fn run(&mut self, target: &Node) -> Result<Vec<Node>, SearchError> {
        let variables = self.session.variables();
        let mut blanket = Vec::new();
        let mut seen: FxHashSet<Vec<String>> = FxHashSet::default();
        while admit_best(&mut self.session, target, &variables, &mut blanket)? {
            shrink_pass(&mut self.session, target, &mut blanket)?;
            if !seen.insert(node_names(&blanket)) {
                debug!(target_node = %target, "blanket revisited an earlier state");
                break;
            }
        }
        while shrink_pass(&mut self.session, target, &mut blanket)? {}
        debug!(target_node = %target, size = blanket.len(), tests = self.session.num_tests(), "interleaved search finished");
        Ok(blanket)
    }
}

impl_mb_search!(Iamb, "IAMB");
impl_mb_search!(InterIamb, "InterIAMB");
