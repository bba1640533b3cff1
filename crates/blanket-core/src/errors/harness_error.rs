//! Evaluation harness errors.

use super::error_code::{self, BlanketErrorCode};
use super::{GraphError, IndTestError, SearchError, SimulationError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HarnessError {
    #[error("No target with a blanket of at least {min_mb_size} nodes after {graphs} graphs")]
    NoEligibleTarget { min_mb_size: usize, graphs: usize },

    #[error("Worker for {algorithm} exited without reporting")]
    WorkerLost { algorithm: String },

    #[error("Failed to spawn worker for {algorithm}: {message}")]
    Spawn { algorithm: String, message: String },

    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Independence test error: {0}")]
    IndTest(#[from] IndTestError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl BlanketErrorCode for HarnessError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoEligibleTarget { .. } => error_code::NO_ELIGIBLE_TARGET,
            Self::WorkerLost { .. } => error_code::WORKER_LOST,
            Self::Spawn { .. } => error_code::WORKER_SPAWN,
            Self::Simulation(e) => e.error_code(),
            Self::IndTest(e) => e.error_code(),
            Self::Search(e) => e.error_code(),
            Self::Graph(e) => e.error_code(),
        }
    }
}
