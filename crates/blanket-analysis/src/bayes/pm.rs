//! Bayes parametric model: a DAG plus a category count per node.

use rand::Rng;

use blanket_core::errors::{GraphError, SimulationError};
use blanket_core::types::collections::FxHashMap;

use crate::graph::{Graph, Node};

#[derive(Debug, Clone)]
pub struct BayesPm {
    dag: Graph,
    categories: FxHashMap<String, usize>,
}

impl BayesPm {
    /// Every node starts with two categories. Fails on a directed cycle.
    pub fn new(dag: Graph) -> Result<Self, SimulationError> {
        dag.ensure_acyclic()?;
        let categories = dag.node_names().into_iter().map(|n| (n, 2)).collect();
        Ok(Self { dag, categories })
    }

    /// Category counts drawn uniformly from `min..=max`.
    pub fn random<R: Rng + ?Sized>(dag: Graph, min: usize, max: usize, rng: &mut R) -> Result<Self, SimulationError> {
        if min < 2 || min > max {
            return Err(SimulationError::InvalidParameter {
                name: "categories".to_string(),
                message: format!("need 2 <= min <= max, got {min}..={max}"),
            });
        }
        let mut pm = Self::new(dag)?;
        for name in pm.dag.node_names() {
            pm.categories.insert(name, rng.gen_range(min..=max));
        }
        Ok(pm)
    }

    /// New model over `dag`, keeping category counts of nodes `previous` already knows.
    pub fn from_previous(dag: Graph, previous: &BayesPm) -> Result<Self, SimulationError> {
        let mut pm = Self::new(dag)?;
        for (name, count) in pm.categories.iter_mut() {
            if let Some(&old) = previous.categories.get(name) {
                *count = old;
            }
        }
        Ok(pm)
    }

    pub fn dag(&self) -> &Graph {
        &self.dag
    }

    pub fn set_num_categories(&mut self, node: &Node, count: usize) -> Result<(), SimulationError> {
        if count < 2 {
            return Err(SimulationError::InvalidParameter {
                name: format!("categories[{}]", node.name()),
                message: "a variable needs at least 2 categories".to_string(),
            });
        }
        let slot = self
            .categories
            .get_mut(node.name())
            .ok_or_else(|| GraphError::node(node.name()))?;
        *slot = count;
        Ok(())
    }

    pub fn num_categories(&self, node: &Node) -> Result<usize, GraphError> {
        self.categories
            .get(node.name())
            .copied()
            .ok_or_else(|| GraphError::node(node.name()))
    }
}
