//! Graph nodes.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Kind of variable a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeType {
    #[default]
    Measured,
    Latent,
    Error,
}

/// How two nodes from different graphs are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeEquality {
    /// Same name.
    #[default]
    Name,
    /// Same name, type, and position.
    Full,
}

/// A named variable. Equality, ordering, and hashing use the name only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    name: String,
    node_type: NodeType,
    position: Option<(i32, i32)>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: NodeType::Measured,
            position: None,
        }
    }

    pub fn latent(name: impl Into<String>) -> Self {
        Self::new(name).with_type(NodeType::Latent)
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.position
    }

    pub fn is_latent(&self) -> bool {
        self.node_type == NodeType::Latent
    }

    pub fn matches(&self, other: &Node, equality: NodeEquality) -> bool {
        match equality {
            NodeEquality::Name => self.name == other.name,
            NodeEquality::Full => {
                self.name == other.name
                    && self.node_type == other.node_type
                    && self.position == other.position
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Sorted names, for logs and assertions.
pub fn node_names(nodes: &[Node]) -> Vec<String> {
    let mut names: Vec<String> = nodes.iter().map(|n| n.name.clone()).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_name_unless_full_is_requested() {
        let a = Node::new("X").with_position(1, 2);
        let b = Node::latent("X");
        assert_eq!(a, b);
        assert!(a.matches(&b, NodeEquality::Name));
        assert!(!a.matches(&b, NodeEquality::Full));
        assert!(a.matches(&a.clone(), NodeEquality::Full));
    }
}
