//! Top-level configuration, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{LoggingConfig, SearchConfig, SimulationConfig};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BlanketConfig {
    pub search: SearchConfig,
    pub simulation: SimulationConfig,
    pub logging: LoggingConfig,
}

impl BlanketConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: BlanketConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Rejects values no search or simulation can run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.search.effective_alpha();
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::invalid("search.alpha", format!("{alpha} is not in (0, 1)")));
        }
        let sim = &self.simulation;
        if sim.effective_min_categories() < 2 {
            return Err(ConfigError::invalid("simulation.min_categories", "must be at least 2"));
        }
        if sim.effective_min_categories() > sim.effective_max_categories() {
            return Err(ConfigError::invalid(
                "simulation.min_categories",
                "must not exceed simulation.max_categories",
            ));
        }
        if sim.effective_edge_multiplier() < 0.0 {
            return Err(ConfigError::invalid("simulation.edge_multiplier", "must be non-negative"));
        }
        if sim.effective_sample_size() == 0 {
            return Err(ConfigError::invalid("simulation.sample_size", "must be positive"));
        }
        Ok(())
    }
}
