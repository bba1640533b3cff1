//! Evaluation harness configuration.

use serde::{Deserialize, Serialize};

use crate::types::MbAlgorithm;

/// Parameters for random graph generation, data simulation, and trial scheduling.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulate categorical data (Bayes net) instead of linear Gaussian. Default: false.
    pub discrete: Option<bool>,
    /// Number of variables in each random DAG. Default: 100.
    pub num_vars: Option<usize>,
    /// Edges per variable. Default: 1.0.
    pub edge_multiplier: Option<f64>,
    /// Rows per simulated dataset. Default: 1000.
    pub sample_size: Option<usize>,
    /// Draw a fresh graph for every trial. Default: true.
    pub random_graph_every_time: Option<bool>,
    /// Number of trials. Default: 30.
    pub num_trials: Option<usize>,
    /// Smallest true blanket a target may have. Default: 8.
    pub min_mb_size: Option<usize>,
    /// Category count bounds for discrete simulation. Defaults: 2 and 4.
    pub min_categories: Option<usize>,
    pub max_categories: Option<usize>,
    /// Seed for the ChaCha RNG. Default: 42.
    pub seed: Option<u64>,
    /// Strategies to evaluate. Default: all of them.
    #[serde(default)]
    pub algorithms: Vec<MbAlgorithm>,
}

impl SimulationConfig {
    pub fn effective_discrete(&self) -> bool {
        self.discrete.unwrap_or(false)
    }

    pub fn effective_num_vars(&self) -> usize {
        self.num_vars.unwrap_or(100)
    }

    pub fn effective_edge_multiplier(&self) -> f64 {
        self.edge_multiplier.unwrap_or(1.0)
    }

    pub fn effective_sample_size(&self) -> usize {
        self.sample_size.unwrap_or(1000)
    }

    pub fn effective_random_graph_every_time(&self) -> bool {
        self.random_graph_every_time.unwrap_or(true)
    }

    pub fn effective_num_trials(&self) -> usize {
        self.num_trials.unwrap_or(30)
    }

    pub fn effective_min_mb_size(&self) -> usize {
        self.min_mb_size.unwrap_or(8)
    }

    pub fn effective_min_categories(&self) -> usize {
        self.min_categories.unwrap_or(2)
    }

    pub fn effective_max_categories(&self) -> usize {
        self.max_categories.unwrap_or(4)
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(42)
    }

    pub fn effective_algorithms(&self) -> Vec<MbAlgorithm> {
        if self.algorithms.is_empty() {
            MbAlgorithm::ALL.to_vec()
        } else {
            self.algorithms.clone()
        }
    }
}
