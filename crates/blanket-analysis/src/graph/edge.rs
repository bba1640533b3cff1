//! Edges with one endpoint mark per node.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::node::Node;

/// Mark at one end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Endpoint {
    Tail,
    Arrow,
    Circle,
}

/// An edge between two distinct nodes. `endpoint1` is the mark at `node1`.
///
/// Equality ignores the storage order of the two ends: `A --> B` equals `B <-- A`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    node1: Node,
    node2: Node,
    endpoint1: Endpoint,
    endpoint2: Endpoint,
}

impl Edge {
    pub fn new(node1: Node, node2: Node, endpoint1: Endpoint, endpoint2: Endpoint) -> Self {
        Self {
            node1,
            node2,
            endpoint1,
            endpoint2,
        }
    }

    /// `from --> to`
    pub fn directed(from: &Node, to: &Node) -> Self {
        Self::new(from.clone(), to.clone(), Endpoint::Tail, Endpoint::Arrow)
    }

    /// `a --- b`
    pub fn undirected(a: &Node, b: &Node) -> Self {
        Self::new(a.clone(), b.clone(), Endpoint::Tail, Endpoint::Tail)
    }

    /// `a <-> b`
    pub fn bidirected(a: &Node, b: &Node) -> Self {
        Self::new(a.clone(), b.clone(), Endpoint::Arrow, Endpoint::Arrow)
    }

    /// `a o-o b`
    pub fn nondirected(a: &Node, b: &Node) -> Self {
        Self::new(a.clone(), b.clone(), Endpoint::Circle, Endpoint::Circle)
    }

    /// `a o-> b`
    pub fn partially_oriented(a: &Node, b: &Node) -> Self {
        Self::new(a.clone(), b.clone(), Endpoint::Circle, Endpoint::Arrow)
    }

    pub fn node1(&self) -> &Node {
        &self.node1
    }

    pub fn node2(&self) -> &Node {
        &self.node2
    }

    pub fn endpoint1(&self) -> Endpoint {
        self.endpoint1
    }

    pub fn endpoint2(&self) -> Endpoint {
        self.endpoint2
    }

    /// Mark at `node`, or `None` when `node` is not an end of this edge.
    pub fn endpoint_at(&self, node: &Node) -> Option<Endpoint> {
        if *node == self.node1 {
            Some(self.endpoint1)
        } else if *node == self.node2 {
            Some(self.endpoint2)
        } else {
            None
        }
    }

    /// The end opposite `node`.
    pub fn distal(&self, node: &Node) -> Option<&Node> {
        if *node == self.node1 {
            Some(&self.node2)
        } else if *node == self.node2 {
            Some(&self.node1)
        } else {
            None
        }
    }

    pub fn is_directed(&self) -> bool {
        matches!(
            (self.endpoint1, self.endpoint2),
            (Endpoint::Tail, Endpoint::Arrow) | (Endpoint::Arrow, Endpoint::Tail)
        )
    }

    pub fn is_undirected(&self) -> bool {
        self.endpoint1 == Endpoint::Tail && self.endpoint2 == Endpoint::Tail
    }

    pub fn is_bidirected(&self) -> bool {
        self.endpoint1 == Endpoint::Arrow && self.endpoint2 == Endpoint::Arrow
    }

    /// True for `from --> to`.
    pub fn points_from_to(&self, from: &Node, to: &Node) -> bool {
        self.endpoint_at(from) == Some(Endpoint::Tail)
            && self.endpoint_at(to) == Some(Endpoint::Arrow)
            && from != to
    }

    /// Copy with the mark at `node` replaced.
    pub fn with_endpoint_at(&self, node: &Node, endpoint: Endpoint) -> Option<Edge> {
        let mut edge = self.clone();
        if *node == self.node1 {
            edge.endpoint1 = endpoint;
        } else if *node == self.node2 {
            edge.endpoint2 = endpoint;
        } else {
            return None;
        }
        Some(edge)
    }

    /// Ends ordered by node name, for hashing and canonical comparison.
    pub(crate) fn canonical(&self) -> (&str, Endpoint, &str, Endpoint) {
        if self.node1.name() <= self.node2.name() {
            (self.node1.name(), self.endpoint1, self.node2.name(), self.endpoint2)
        } else {
            (self.node2.name(), self.endpoint2, self.node1.name(), self.endpoint1)
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let left = match self.endpoint1 {
            Endpoint::Tail => '-',
            Endpoint::Arrow => '<',
            Endpoint::Circle => 'o',
        };
        let right = match self.endpoint2 {
            Endpoint::Tail => '-',
            Endpoint::Arrow => '>',
            Endpoint::Circle => 'o',
        };
        write!(f, "{} {}-{} {}", self.node1, left, right, self.node2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_storage_is_equal() {
        let a = Node::new("A");
        let b = Node::new("B");
        let forward = Edge::directed(&a, &b);
        let backward = Edge::new(b.clone(), a.clone(), Endpoint::Arrow, Endpoint::Tail);
        assert_eq!(forward, backward);
        assert_ne!(forward, Edge::directed(&b, &a));
        assert_eq!(forward.to_string(), "A --> B");
        assert_eq!(Edge::bidirected(&a, &b).to_string(), "A <-> B");
        assert_eq!(Edge::partially_oriented(&a, &b).to_string(), "A o-> B");
    }

    #[test]
    fn points_from_to_respects_marks() {
        let a = Node::new("A");
        let b = Node::new("B");
        let e = Edge::directed(&a, &b);
        assert!(e.points_from_to(&a, &b));
        assert!(!e.points_from_to(&b, &a));
        assert!(!Edge::undirected(&a, &b).points_from_to(&a, &b));
    }
}
