//! Separating sets recorded while searching, keyed by unordered node pair.

use blanket_core::types::collections::FxHashMap;

use crate::graph::Node;

#[derive(Debug, Clone, Default)]
pub struct SepsetMap {
    sets: FxHashMap<(String, String), Vec<Node>>,
}

impl SepsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(x: &Node, y: &Node) -> (String, String) {
        if x.name() <= y.name() {
            (x.name().to_string(), y.name().to_string())
        } else {
            (y.name().to_string(), x.name().to_string())
        }
    }

    /// Records `z` as separating `x` and `y`, replacing any earlier set.
    pub fn set(&mut self, x: &Node, y: &Node, z: Vec<Node>) {
        self.sets.insert(Self::key(x, y), z);
    }

    pub fn get(&self, x: &Node, y: &Node) -> Option<&[Node]> {
        self.sets.get(&Self::key(x, y)).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }
}
