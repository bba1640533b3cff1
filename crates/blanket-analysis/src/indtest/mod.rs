//! Conditional independence tests.
//!
//! Every call returns its verdict, p-value, and statistic by value, so one test instance
//! can be shared across threads behind an `Arc`.

pub mod dsep;
pub mod fisher_z;
pub mod g_square;
mod linalg;

pub use dsep::DSeparationTest;
pub use fisher_z::FisherZTest;
pub use g_square::GSquareTest;

use serde::{Deserialize, Serialize};

use blanket_core::errors::IndTestError;

use crate::graph::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Independent,
    Dependent,
    /// The statistic is degenerate (singular covariance, no degrees of freedom left).
    Undetermined,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndependenceResult {
    pub outcome: Outcome,
    pub p_value: f64,
    pub statistic: f64,
}

impl IndependenceResult {
    pub fn independent(p_value: f64, statistic: f64) -> Self {
        Self {
            outcome: Outcome::Independent,
            p_value,
            statistic,
        }
    }

    pub fn dependent(p_value: f64, statistic: f64) -> Self {
        Self {
            outcome: Outcome::Dependent,
            p_value,
            statistic,
        }
    }

    pub fn undetermined() -> Self {
        Self {
            outcome: Outcome::Undetermined,
            p_value: f64::NAN,
            statistic: f64::NAN,
        }
    }

    /// Verdict from a p-value: independent when `p > alpha`.
    pub fn from_p_value(p_value: f64, statistic: f64, alpha: f64) -> Self {
        if !p_value.is_finite() {
            Self::undetermined()
        } else if p_value > alpha {
            Self::independent(p_value, statistic)
        } else {
            Self::dependent(p_value, statistic)
        }
    }

    pub fn is_independent(&self) -> bool {
        self.outcome == Outcome::Independent
    }

    pub fn is_dependent(&self) -> bool {
        self.outcome == Outcome::Dependent
    }

    pub fn is_undetermined(&self) -> bool {
        self.outcome == Outcome::Undetermined
    }
}

/// Answers "is `x` independent of `y` given `z`?" over a fixed universe of variables.
pub trait IndependenceTest: Send + Sync {
    fn check(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, IndTestError>;

    fn variables(&self) -> &[Node];

    fn variable(&self, name: &str) -> Option<&Node> {
        self.variables().iter().find(|v| v.name() == name)
    }

    fn alpha(&self) -> f64;

    fn name(&self) -> &str;
}

pub(crate) fn check_alpha(alpha: f64) -> Result<(), IndTestError> {
    if alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(IndTestError::InvalidAlpha { alpha })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p_value_verdicts() {
        assert!(IndependenceResult::from_p_value(0.2, 1.0, 0.05).is_independent());
        assert!(IndependenceResult::from_p_value(0.05, 1.0, 0.05).is_dependent());
        assert!(IndependenceResult::from_p_value(f64::NAN, 1.0, 0.05).is_undetermined());
    }
}
