//! d-separation (m-separation for mixed graphs) via the ancestral moral graph.
//!
//! `x` and `y` are d-connected given `z` exactly when they are connected in the moral graph
//! of the ancestors of `{x, y} ∪ z` by a path that avoids `z`.

use std::collections::VecDeque;

use petgraph::stable_graph::NodeIndex;

use blanket_core::errors::GraphError;
use blanket_core::types::collections::{FxHashMap, FxHashSet};

use super::graph::Graph;
use super::node::Node;
use crate::combinatorics::{select, ChoiceGenerator};

impl Graph {
    /// Ancestors of `seeds` through directed edges, seeds included.
    pub(crate) fn ancestor_indices(&self, seeds: &[NodeIndex]) -> FxHashSet<NodeIndex> {
        let mut seen: FxHashSet<NodeIndex> = seeds.iter().copied().collect();
        let mut queue: VecDeque<NodeIndex> = seeds.iter().copied().collect();
        while let Some(idx) = queue.pop_front() {
            for parent in self.parent_indices(idx) {
                if seen.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }
        seen
    }

    pub fn ancestors(&self, nodes: &[Node]) -> Result<Vec<Node>, GraphError> {
        let seeds: Vec<NodeIndex> = nodes.iter().map(|n| self.index_of(n)).collect::<Result<_, _>>()?;
        let anc = self.ancestor_indices(&seeds);
        Ok(self
            .inner
            .node_indices()
            .filter(|i| anc.contains(i))
            .map(|i| self.node_at(i).clone())
            .collect())
    }

    pub fn is_ancestor_of(&self, a: &Node, b: &Node) -> Result<bool, GraphError> {
        let ai = self.index_of(a)?;
        let bi = self.index_of(b)?;
        Ok(self.ancestor_indices(&[bi]).contains(&ai))
    }

    /// Undirected moral graph over `within`: skeleton edges plus full connection inside
    /// each district (bidirected component) together with the district's parents.
    fn moralize(&self, within: &FxHashSet<NodeIndex>) -> FxHashMap<NodeIndex, FxHashSet<NodeIndex>> {
        let mut moral: FxHashMap<NodeIndex, FxHashSet<NodeIndex>> = FxHashMap::default();
        let link = |moral: &mut FxHashMap<NodeIndex, FxHashSet<NodeIndex>>, a: NodeIndex, b: NodeIndex| {
            if a != b {
                moral.entry(a).or_default().insert(b);
                moral.entry(b).or_default().insert(a);
            }
        };

        for &idx in within {
            for other in self.adjacent_indices(idx) {
                if within.contains(&other) {
                    link(&mut moral, idx, other);
                }
            }
        }

        let mut assigned: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut ordered: Vec<NodeIndex> = within.iter().copied().collect();
        ordered.sort_by_key(|i| i.index());
        for start in ordered {
            if !assigned.insert(start) {
                continue;
            }
            let mut district = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(idx) = queue.pop_front() {
                for spouse in self.spouse_indices(idx) {
                    if within.contains(&spouse) && assigned.insert(spouse) {
                        district.push(spouse);
                        queue.push_back(spouse);
                    }
                }
            }
            let mut family: FxHashSet<NodeIndex> = district.iter().copied().collect();
            for &member in &district {
                family.extend(self.parent_indices(member).into_iter().filter(|p| within.contains(p)));
            }
            let family: Vec<NodeIndex> = family.into_iter().collect();
            for (i, &a) in family.iter().enumerate() {
                for &b in &family[i + 1..] {
                    link(&mut moral, a, b);
                }
            }
        }
        moral
    }

    /// Whether `x` and `y` are d-connected given `z`. A node is d-connected to itself;
    /// a node inside `z` is d-connected to nothing else.
    pub fn is_d_connected_to(&self, x: &Node, y: &Node, z: &[Node]) -> Result<bool, GraphError> {
        let xi = self.index_of(x)?;
        let yi = self.index_of(y)?;
        let zi: FxHashSet<NodeIndex> = z.iter().map(|n| self.index_of(n)).collect::<Result<_, _>>()?;
        if xi == yi {
            return Ok(true);
        }
        if zi.contains(&xi) || zi.contains(&yi) {
            return Ok(false);
        }

        let mut seeds = vec![xi, yi];
        seeds.extend(zi.iter().copied());
        let ancestral = self.ancestor_indices(&seeds);
        let moral = self.moralize(&ancestral);

        let mut visited: FxHashSet<NodeIndex> = FxHashSet::default();
        let mut queue = VecDeque::from([xi]);
        visited.insert(xi);
        while let Some(current) = queue.pop_front() {
            let Some(neighbors) = moral.get(&current) else {
                continue;
            };
            for &next in neighbors {
                if next == yi {
                    return Ok(true);
                }
                if zi.contains(&next) || !visited.insert(next) {
                    continue;
                }
                queue.push_back(next);
            }
        }
        Ok(false)
    }

    pub fn is_d_separated_from(&self, x: &Node, y: &Node, z: &[Node]) -> Result<bool, GraphError> {
        Ok(!self.is_d_connected_to(x, y, z)?)
    }

    /// A set that d-separates `x` and `y`, smallest subsets of adj(x) first, then adj(y),
    /// then the ancestors of both. `None` when adjacent or when no witness exists.
    pub fn sepset(&self, x: &Node, y: &Node) -> Result<Option<Vec<Node>>, GraphError> {
        if x == y || self.is_adjacent(x, y)? {
            return Ok(None);
        }
        for (a, b) in [(x, y), (y, x)] {
            let candidates: Vec<Node> = self
                .adjacent_nodes(a)?
                .into_iter()
                .filter(|n| n != b)
                .collect();
            for size in 0..=candidates.len() {
                for choice in ChoiceGenerator::new(candidates.len(), size) {
                    let cond = select(&candidates, &choice);
                    if self.is_d_separated_from(x, y, &cond)? {
                        return Ok(Some(cond));
                    }
                }
            }
        }
        let fallback: Vec<Node> = self
            .ancestors(&[x.clone(), y.clone()])?
            .into_iter()
            .filter(|n| n != x && n != y)
            .collect();
        if self.is_d_separated_from(x, y, &fallback)? {
            return Ok(Some(fallback));
        }
        Ok(None)
    }
}
