//! Linear Gaussian structural equation models.

use ndarray::Array2;
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;

use blanket_core::errors::{GraphError, SimulationError};
use blanket_core::types::collections::FxHashMap;

use crate::graph::{Graph, Node};
use super::dataset::ContinuousDataSet;

/// `X_j = sum_i b_ij X_i + e_j` over a DAG, with `e_j ~ N(0, sd_j^2)`.
#[derive(Debug, Clone)]
pub struct LinearSem {
    order: Vec<Node>,
    parents: Vec<Vec<(usize, f64)>>,
    error_sd: Vec<f64>,
}

impl LinearSem {
    /// Draws coefficients from `±[0.5, 1.5]` and error standard deviations from `[1, 3]`.
    pub fn random<R: Rng + ?Sized>(dag: &Graph, rng: &mut R) -> Result<Self, SimulationError> {
        let order = dag.topological_order()?;
        let position: FxHashMap<String, usize> = order
            .iter()
            .enumerate()
            .map(|(i, n)| (n.name().to_string(), i))
            .collect();
        let mut parents = Vec::with_capacity(order.len());
        let mut error_sd = Vec::with_capacity(order.len());
        for node in &order {
            let mut coefs = Vec::new();
            for parent in dag.parents(node)? {
                let magnitude = rng.gen_range(0.5..1.5);
                let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                coefs.push((position[parent.name()], sign * magnitude));
            }
            parents.push(coefs);
            error_sd.push(rng.gen_range(1.0..3.0));
        }
        Ok(Self {
            order,
            parents,
            error_sd,
        })
    }

    pub fn coefficient(&self, from: &str, to: &str) -> Option<f64> {
        let from_pos = self.order.iter().position(|n| n.name() == from)?;
        let to_pos = self.order.iter().position(|n| n.name() == to)?;
        self.parents[to_pos]
            .iter()
            .find(|(p, _)| *p == from_pos)
            .map(|(_, c)| *c)
    }

    /// Samples `n` rows. Latent variables are simulated but left out of the result;
    /// columns follow the graph's node order.
    pub fn simulate<R: Rng + ?Sized>(&self, dag: &Graph, n: usize, rng: &mut R) -> Result<ContinuousDataSet, SimulationError> {
        if n == 0 {
            return Err(SimulationError::InvalidParameter {
                name: "sample_size".to_string(),
                message: "must be positive".to_string(),
            });
        }
        let p = self.order.len();
        let mut noise = Vec::with_capacity(p);
        for &sd in &self.error_sd {
            let normal = Normal::new(0.0, sd).map_err(|e| SimulationError::InvalidParameter {
                name: "error_sd".to_string(),
                message: e.to_string(),
            })?;
            noise.push(normal);
        }

        let mut full = Array2::<f64>::zeros((n, p));
        for row in 0..n {
            for j in 0..p {
                let mut value = noise[j].sample(rng);
                for &(parent, coef) in &self.parents[j] {
                    value += coef * full[[row, parent]];
                }
                full[[row, j]] = value;
            }
        }

        let measured: Vec<Node> = dag.nodes().into_iter().filter(|v| !v.is_latent()).collect();
        let mut data = Array2::<f64>::zeros((n, measured.len()));
        for (out_col, var) in measured.iter().enumerate() {
            let Some(src) = self.order.iter().position(|o| o == var) else {
                return Err(SimulationError::Graph(GraphError::node(var.name())));
            };
            data.column_mut(out_col).assign(&full.column(src));
        }
        tracing::debug!(rows = n, columns = measured.len(), "simulated linear SEM data");
        ContinuousDataSet::new(measured, data).map_err(|e| SimulationError::InvalidParameter {
            name: "dataset".to_string(),
            message: e.to_string(),
        })
    }
}
