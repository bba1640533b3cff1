//! Handling of undetermined independence results.

use serde::{Deserialize, Serialize};

/// What a search does when a test cannot decide (singular covariance, empty strata).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndeterminedPolicy {
    /// Keep the edge or candidate.
    #[default]
    AssumeDependent,
    /// Drop the edge or candidate.
    AssumeIndependent,
    /// Abort the search with `SearchError::Undetermined`.
    Fail,
}
