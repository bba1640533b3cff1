//! Building blocks shared by the constraint-based searches: association ranking,
//! bounded separator search, and the spouse phase.

use std::cmp::Ordering;

use tracing::debug;

use blanket_core::errors::SearchError;
use blanket_core::Depth;

use super::sepset::SepsetMap;
use super::session::TestSession;
use crate::combinatorics::{select, DepthChoiceGenerator};
use crate::graph::Node;
use crate::indtest::IndependenceResult;

/// Strongest association first: lowest p-value, then largest |statistic|.
/// A NaN p-value ranks as the weakest association.
pub(crate) fn association_order(a: &IndependenceResult, b: &IndependenceResult) -> Ordering {
    let pa = if a.p_value.is_nan() { f64::INFINITY } else { a.p_value };
    let pb = if b.p_value.is_nan() { f64::INFINITY } else { b.p_value };
    pa.total_cmp(&pb).then_with(|| {
        let sa = if a.statistic.is_nan() { 0.0 } else { a.statistic.abs() };
        let sb = if b.statistic.is_nan() { 0.0 } else { b.statistic.abs() };
        sb.total_cmp(&sa)
    })
}

/// Tests `target` against each candidate given `given`, strongest association first.
pub(crate) fn rank_by_association(
    session: &mut TestSession,
    target: &Node,
    candidates: &[Node],
    given: &[Node],
) -> Result<Vec<(Node, IndependenceResult)>, SearchError> {
    let mut ranked = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let result = session.check(target, candidate, given)?;
        ranked.push((candidate.clone(), result));
    }
    ranked.sort_by(|a, b| association_order(&a.1, &b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(ranked)
}

/// First subset of `pool` within `depth` that separates `x` and `y`, smallest sets first.
pub(crate) fn find_separator(
    session: &mut TestSession,
    x: &Node,
    y: &Node,
    pool: &[Node],
    depth: Depth,
) -> Result<Option<Vec<Node>>, SearchError> {
    let pool: Vec<Node> = pool.iter().filter(|n| *n != x && *n != y).cloned().collect();
    for choice in DepthChoiceGenerator::new(pool.len(), depth.limit(pool.len())) {
        let given = select(&pool, &choice);
        if session.is_independent(x, y, &given)? {
            return Ok(Some(given));
        }
    }
    Ok(None)
}

/// Source of parents-and-children sets plus the separating sets found computing them.
pub(crate) trait PcSource {
    fn session(&mut self) -> &mut TestSession;

    fn depth(&self) -> Depth;

    fn pc_of(&mut self, node: &Node) -> Result<Vec<Node>, SearchError>;

    fn sepsets(&self) -> &SepsetMap;
}

/// PC(target) plus every spouse reachable through a PC member.
///
/// Y is a spouse through X when T and Y are non-adjacent, Y is in PC(X), and T and Y
/// are dependent given sepset(T, Y) plus X.
pub(crate) fn blanket_from_pc<S: PcSource>(source: &mut S, target: &Node) -> Result<Vec<Node>, SearchError> {
    let pc = source.pc_of(target)?;
    debug!(target = %target, pc = pc.len(), "parents and children found");
    let mut blanket = pc.clone();
    for x in &pc {
        for y in source.pc_of(x)? {
            if y == *target || blanket.contains(&y) {
                continue;
            }
            let Some(mut given) = separator_for(source, target, &y, &pc)? else {
                continue;
            };
            if !given.contains(x) {
                given.push(x.clone());
            }
            if !source.session().is_independent(target, &y, &given)? {
                debug!(target = %target, spouse = %y, through = %x, "spouse admitted");
                blanket.push(y);
            }
        }
    }
    Ok(blanket)
}

/// Recorded sepset, else a fresh search over subsets of PC(target) then PC(y).
fn separator_for<S: PcSource>(source: &mut S, target: &Node, y: &Node, pc: &[Node]) -> Result<Option<Vec<Node>>, SearchError> {
    if let Some(recorded) = source.sepsets().get(target, y) {
        return Ok(Some(recorded.to_vec()));
    }
    let depth = source.depth();
    if let Some(found) = find_separator(source.session(), target, y, pc, depth)? {
        return Ok(Some(found));
    }
    let pc_y = source.pc_of(y)?;
    find_separator(source.session(), target, y, &pc_y, depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_p_then_larger_statistic_ranks_first() {
        let strong = IndependenceResult::dependent(0.001, 2.0);
        let stronger_stat = IndependenceResult::dependent(0.001, -5.0);
        let weak = IndependenceResult::independent(0.4, 0.1);
        let nan = IndependenceResult::undetermined();
        let mut all = vec![weak, nan, strong, stronger_stat];
        all.sort_by(association_order);
        assert_eq!(all[0].statistic, -5.0);
        assert_eq!(all[1].statistic, 2.0);
        assert_eq!(all[2].p_value, 0.4);
        assert!(all[3].p_value.is_nan());
    }
}
