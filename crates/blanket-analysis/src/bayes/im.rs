//! Bayes instantiated model: one conditional probability table per node.
//!
//! Row `r` of a node's table is the distribution of the node given the parent
//! configuration encoded by `r` (mixed radix, last parent varying fastest).

use ndarray::Array2;
use rand::Rng;

use blanket_core::errors::{GraphError, SimulationError};
use blanket_core::types::collections::FxHashMap;

use super::pm::BayesPm;
use crate::data::DiscreteDataSet;
use crate::graph::Node;

/// How tables that cannot be carried over are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initialization {
    /// Every probability is NaN (unspecified).
    Manual,
    /// Uniform draws normalized per row.
    Random,
}

#[derive(Debug, Clone)]
struct NodeTable {
    node: Node,
    categories: usize,
    parents: Vec<usize>,
    parent_dims: Vec<usize>,
    probs: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct BayesIm {
    pm: BayesPm,
    tables: Vec<NodeTable>,
    index: FxHashMap<String, usize>,
}

fn fill_row<R: Rng + ?Sized>(categories: usize, init: Initialization, rng: &mut R) -> Vec<f64> {
    match init {
        Initialization::Manual => vec![f64::NAN; categories],
        Initialization::Random => {
            let raw: Vec<f64> = (0..categories).map(|_| rng.gen_range(0.05..1.0)).collect();
            let total: f64 = raw.iter().sum();
            raw.into_iter().map(|v| v / total).collect()
        }
    }
}

impl BayesIm {
    pub fn new<R: Rng + ?Sized>(pm: BayesPm, init: Initialization, rng: &mut R) -> Result<Self, SimulationError> {
        Self::build(pm, None, init, rng)
    }

    /// Copies a node's table from `old` when the node, its category count, and its
    /// ordered parents (with their category counts) are unchanged. Other tables use `init`.
    pub fn from_previous<R: Rng + ?Sized>(
        pm: BayesPm,
        old: &BayesIm,
        init: Initialization,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        Self::build(pm, Some(old), init, rng)
    }

    fn build<R: Rng + ?Sized>(
        pm: BayesPm,
        old: Option<&BayesIm>,
        init: Initialization,
        rng: &mut R,
    ) -> Result<Self, SimulationError> {
        let nodes = pm.dag().nodes();
        let index: FxHashMap<String, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name().to_string(), i))
            .collect();

        let mut tables = Vec::with_capacity(nodes.len());
        for node in &nodes {
            let categories = pm.num_categories(node)?;
            let parent_nodes = pm.dag().parents(node)?;
            let parents: Vec<usize> = parent_nodes.iter().map(|p| index[p.name()]).collect();
            let parent_dims: Vec<usize> = parent_nodes
                .iter()
                .map(|p| pm.num_categories(p))
                .collect::<Result<_, _>>()?;
            let rows: usize = parent_dims.iter().product();

            let carried = old.and_then(|o| o.reusable_table(node, categories, &parent_nodes, &parent_dims));
            let probs = match carried {
                Some(probs) => probs,
                None => (0..rows).map(|_| fill_row(categories, init, rng)).collect(),
            };
            tables.push(NodeTable {
                node: node.clone(),
                categories,
                parents,
                parent_dims,
                probs,
            });
        }
        Ok(Self { pm, tables, index })
    }

    fn reusable_table(&self, node: &Node, categories: usize, parents: &[Node], parent_dims: &[usize]) -> Option<Vec<Vec<f64>>> {
        let table = &self.tables[*self.index.get(node.name())?];
        let old_parents: Vec<&Node> = table.parents.iter().map(|&p| &self.tables[p].node).collect();
        let same_parents = old_parents.len() == parents.len() && old_parents.iter().zip(parents).all(|(a, b)| *a == b);
        if table.categories == categories && same_parents && table.parent_dims == parent_dims {
            Some(table.probs.clone())
        } else {
            None
        }
    }

    pub fn pm(&self) -> &BayesPm {
        &self.pm
    }

    pub fn num_nodes(&self) -> usize {
        self.tables.len()
    }

    pub fn node_index(&self, node: &Node) -> Result<usize, GraphError> {
        self.index.get(node.name()).copied().ok_or_else(|| GraphError::node(node.name()))
    }

    pub fn num_rows(&self, node: usize) -> usize {
        self.tables[node].probs.len()
    }

    pub fn num_columns(&self, node: usize) -> usize {
        self.tables[node].categories
    }

    pub fn parents(&self, node: usize) -> &[usize] {
        &self.tables[node].parents
    }

    pub fn probability(&self, node: usize, row: usize, category: usize) -> f64 {
        self.tables[node].probs[row][category]
    }

    pub fn set_probability(&mut self, node: usize, row: usize, category: usize, value: f64) {
        self.tables[node].probs[row][category] = value;
    }

    pub fn table(&self, node: usize) -> &[Vec<f64>] {
        &self.tables[node].probs
    }

    /// Row index of a parent configuration (values in parent order).
    pub fn row_index(&self, node: usize, parent_values: &[usize]) -> usize {
        let dims = &self.tables[node].parent_dims;
        parent_values
            .iter()
            .zip(dims)
            .fold(0, |acc, (&v, &d)| acc * d + v)
    }

    pub fn is_row_unspecified(&self, node: usize, row: usize) -> bool {
        self.tables[node].probs[row].iter().any(|p| p.is_nan())
    }

    /// True when every entry of the node's table is NaN.
    pub fn is_table_unspecified(&self, node: usize) -> bool {
        self.tables[node].probs.iter().all(|row| row.iter().all(|p| p.is_nan()))
    }

    pub fn is_incomplete(&self) -> bool {
        (0..self.tables.len()).any(|n| (0..self.num_rows(n)).any(|r| self.is_row_unspecified(n, r)))
    }

    /// Forward-samples `n` rows in causal order. Latent variables are left out.
    pub fn simulate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<DiscreteDataSet, SimulationError> {
        for table in &self.tables {
            if table.probs.iter().any(|row| row.iter().any(|p| p.is_nan())) {
                return Err(SimulationError::UnspecifiedTable {
                    node: table.node.name().to_string(),
                });
            }
        }
        let order: Vec<usize> = self
            .pm
            .dag()
            .topological_order()?
            .iter()
            .map(|n| self.index[n.name()])
            .collect();

        let p = self.tables.len();
        let mut full = Array2::<usize>::zeros((n, p));
        let mut parent_values = Vec::new();
        for row in 0..n {
            for &j in &order {
                let table = &self.tables[j];
                parent_values.clear();
                parent_values.extend(table.parents.iter().map(|&q| full[[row, q]]));
                let dist = &table.probs[self.row_index(j, &parent_values)];
                let draw: f64 = rng.gen();
                let mut cumulative = 0.0;
                let mut value = table.categories - 1;
                for (k, &prob) in dist.iter().enumerate() {
                    cumulative += prob;
                    if draw < cumulative {
                        value = k;
                        break;
                    }
                }
                full[[row, j]] = value;
            }
        }

        let measured: Vec<usize> = (0..p).filter(|&j| !self.tables[j].node.is_latent()).collect();
        let mut data = Array2::<usize>::zeros((n, measured.len()));
        for (out_col, &src) in measured.iter().enumerate() {
            data.column_mut(out_col).assign(&full.column(src));
        }
        let variables = measured.iter().map(|&j| self.tables[j].node.clone()).collect();
        let categories = measured.iter().map(|&j| self.tables[j].categories).collect();
        tracing::debug!(rows = n, columns = measured.len(), "simulated Bayes net data");
        DiscreteDataSet::new(variables, data, categories).map_err(|e| SimulationError::InvalidParameter {
            name: "dataset".to_string(),
            message: e.to_string(),
        })
    }
}
