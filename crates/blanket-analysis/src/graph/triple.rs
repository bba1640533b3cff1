//! Node triples `<x, y, z>` with `y` in the middle.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::node::Node;

/// A triple is equal to its mirror image: `<x, y, z> == <z, y, x>`.
#[derive(Debug, Clone)]
pub struct Triple {
    pub x: Node,
    pub y: Node,
    pub z: Node,
}

impl Triple {
    pub fn new(x: &Node, y: &Node, z: &Node) -> Self {
        Self {
            x: x.clone(),
            y: y.clone(),
            z: z.clone(),
        }
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.x == *node || self.y == *node || self.z == *node
    }

    fn ends(&self) -> (&Node, &Node) {
        if self.x <= self.z {
            (&self.x, &self.z)
        } else {
            (&self.z, &self.x)
        }
    }
}

impl PartialEq for Triple {
    fn eq(&self, other: &Self) -> bool {
        self.y == other.y && self.ends() == other.ends()
    }
}

impl Eq for Triple {}

impl Hash for Triple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (a, b) = self.ends();
        a.hash(state);
        self.y.hash(state);
        b.hash(state);
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}
