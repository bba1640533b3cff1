//! Conservative classification and orientation of unshielded triples.
//!
//! For x - y - z with x and z nonadjacent, every subset of adj(x) \ {z} and of
//! adj(z) \ {x} within depth is tried as a separator of x and z. Only separators that
//! all avoid y make a collider; only separators that all contain y make a noncollider.
//! Anything else, including finding no separator at all, is ambiguous.

use std::fmt;

use tracing::{debug, trace};

use blanket_core::errors::SearchError;
use blanket_core::Depth;

use super::session::TestSession;
use crate::combinatorics::{select, ChoiceGenerator, DepthChoiceGenerator};
use crate::graph::{Endpoint, Graph, Knowledge, Node, Triple};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripleType {
    Collider,
    Noncollider,
    Ambiguous,
}

impl fmt::Display for TripleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TripleType::Collider => "collider",
            TripleType::Noncollider => "noncollider",
            TripleType::Ambiguous => "ambiguous",
        };
        f.write_str(s)
    }
}

/// Triples seen by one orientation pass, by verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleClassification {
    pub colliders: Vec<Triple>,
    pub noncolliders: Vec<Triple>,
    pub ambiguous: Vec<Triple>,
}

impl TripleClassification {
    pub fn len(&self) -> usize {
        self.colliders.len() + self.noncolliders.len() + self.ambiguous.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn classify_triple(
    session: &mut TestSession,
    graph: &Graph,
    x: &Node,
    y: &Node,
    z: &Node,
    depth: Depth,
) -> Result<TripleType, SearchError> {
    let mut with_y = false;
    let mut without_y = false;

    for (from, other) in [(x, z), (z, x)] {
        let pool: Vec<Node> = graph.adjacent_nodes(from)?.into_iter().filter(|n| n != other).collect();
        for choice in DepthChoiceGenerator::new(pool.len(), depth.limit(pool.len())) {
            let given = select(&pool, &choice);
            if session.is_independent(x, z, &given)? {
                if given.contains(y) {
                    with_y = true;
                } else {
                    without_y = true;
                }
            }
            if with_y && without_y {
                return Ok(TripleType::Ambiguous);
            }
        }
    }

    Ok(if with_y == without_y {
        TripleType::Ambiguous
    } else if without_y {
        TripleType::Collider
    } else {
        TripleType::Noncollider
    })
}

/// Both arrowheads into `y` are permitted by `knowledge`.
pub fn collider_allowed(knowledge: &Knowledge, x: &Node, y: &Node, z: &Node) -> bool {
    arrowpoint_allowed(knowledge, x, y) && arrowpoint_allowed(knowledge, z, y)
}

fn arrowpoint_allowed(knowledge: &Knowledge, from: &Node, to: &Node) -> bool {
    !knowledge.is_required(to, from) && !knowledge.is_forbidden(from, to)
}

/// Classifies every unshielded triple centered on a node of `centers`, orients allowed
/// colliders, and records ambiguous triples on the graph.
pub fn orient_unshielded_triples(
    session: &mut TestSession,
    graph: &mut Graph,
    knowledge: &Knowledge,
    depth: Depth,
    centers: &[Node],
) -> Result<TripleClassification, SearchError> {
    let mut out = TripleClassification::default();
    for y in centers {
        if !graph.contains_node(y) {
            continue;
        }
        let adj = graph.adjacent_nodes(y)?;
        if adj.len() < 2 {
            continue;
        }
        for pair in ChoiceGenerator::new(adj.len(), 2) {
            let (x, z) = (&adj[pair[0]], &adj[pair[1]]);
            if graph.is_adjacent(x, z)? {
                continue;
            }
            let kind = classify_triple(session, graph, x, y, z, depth)?;
            let triple = Triple::new(x, y, z);
            trace!(%triple, %kind, "triple classified");
            match kind {
                TripleType::Collider => {
                    if collider_allowed(knowledge, x, y, z) {
                        graph.set_endpoint(x, y, Endpoint::Arrow)?;
                        graph.set_endpoint(z, y, Endpoint::Arrow)?;
                    }
                    out.colliders.push(triple);
                }
                TripleType::Ambiguous => {
                    graph.add_ambiguous_triple(x, y, z)?;
                    out.ambiguous.push(triple);
                }
                TripleType::Noncollider => out.noncolliders.push(triple),
            }
        }
    }
    debug!(
        colliders = out.colliders.len(),
        noncolliders = out.noncolliders.len(),
        ambiguous = out.ambiguous.len(),
        "unshielded triples classified"
    );
    Ok(out)
}
