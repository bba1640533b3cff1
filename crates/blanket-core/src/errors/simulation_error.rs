//! Data simulation errors.

use super::error_code::{self, BlanketErrorCode};
use super::GraphError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("Conditional probability table for {node} has unspecified rows")]
    UnspecifiedTable { node: String },

    #[error("Invalid simulation parameter {name}: {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

impl BlanketErrorCode for SimulationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnspecifiedTable { .. } => error_code::UNSPECIFIED_TABLE,
            Self::InvalidParameter { .. } => error_code::INVALID_SIMULATION_PARAMETER,
            Self::Graph(e) => e.error_code(),
        }
    }
}
