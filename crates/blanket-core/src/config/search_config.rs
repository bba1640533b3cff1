//! Markov blanket search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{Depth, UndeterminedPolicy};

/// Knobs shared by every search strategy.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum conditioning set size, -1 for unbounded. Default: 3.
    pub depth: Option<Depth>,
    /// Significance level for statistical tests. Default: 0.05.
    pub alpha: Option<f64>,
    /// Handling of undetermined test results. Default: assume dependent.
    pub undetermined: Option<UndeterminedPolicy>,
    /// Wall-clock budget per search in milliseconds. Default: 300000.
    pub time_limit_ms: Option<u64>,
}

impl SearchConfig {
    pub fn effective_depth(&self) -> Depth {
        self.depth.unwrap_or_default()
    }

    pub fn effective_alpha(&self) -> f64 {
        self.alpha.unwrap_or(0.05)
    }

    pub fn effective_undetermined(&self) -> UndeterminedPolicy {
        self.undetermined.unwrap_or_default()
    }

    pub fn effective_time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms.unwrap_or(300_000))
    }
}
