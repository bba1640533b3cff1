//! Graph structure errors.

use super::error_code::{self, BlanketErrorCode};

/// Errors raised by structural graph queries and mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("Node not in graph: {name}")]
    NodeNotInGraph { name: String },

    #[error("Edge not in graph: {edge}")]
    EdgeNotInGraph { edge: String },

    #[error("Invalid triple <{x}, {y}, {z}>: {y} must be adjacent to both {x} and {z}")]
    InvalidTriple { x: String, y: String, z: String },

    #[error("Cannot parse graph spec '{input}': {message}")]
    Parse { input: String, message: String },

    #[error("Graph contains a directed cycle through {name}")]
    Cycle { name: String },
}

impl GraphError {
    pub fn node(name: impl Into<String>) -> Self {
        Self::NodeNotInGraph { name: name.into() }
    }
}

impl BlanketErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NodeNotInGraph { .. } => error_code::NODE_NOT_IN_GRAPH,
            Self::EdgeNotInGraph { .. } => error_code::EDGE_NOT_IN_GRAPH,
            Self::InvalidTriple { .. } => error_code::INVALID_TRIPLE,
            Self::Parse { .. } => error_code::GRAPH_PARSE,
            Self::Cycle { .. } => error_code::GRAPH_CYCLE,
        }
    }
}
