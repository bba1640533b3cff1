//! Markov blanket search errors.

use std::time::Duration;

use super::error_code::{self, BlanketErrorCode};
use super::{GraphError, IndTestError};

/// Errors raised by Markov blanket searches.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SearchError {
    #[error("Target not in test universe: {name}")]
    UnknownTarget { name: String },

    /// The search was cancelled or ran past its deadline. Not a correctness failure.
    #[error("Search abandoned after {tests} independence tests ({elapsed:?})")]
    Abandoned { tests: usize, elapsed: Duration },

    #[error("Undetermined independence result for {x} _||_ {y} | {{{z}}}")]
    Undetermined { x: String, y: String, z: String },

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Independence test error: {0}")]
    IndTest(#[from] IndTestError),
}

impl SearchError {
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned { .. })
    }
}

impl BlanketErrorCode for SearchError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTarget { .. } => error_code::UNKNOWN_TARGET,
            Self::Abandoned { .. } => error_code::SEARCH_ABANDONED,
            Self::Undetermined { .. } => error_code::SEARCH_UNDETERMINED,
            Self::Graph(e) => e.error_code(),
            Self::IndTest(e) => e.error_code(),
        }
    }
}
