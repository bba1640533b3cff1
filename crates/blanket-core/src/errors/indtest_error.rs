//! Independence test errors.

use super::error_code::{self, BlanketErrorCode};

/// Errors raised by conditional independence tests.
///
/// Degenerate statistics are not errors: they surface as an `Undetermined` outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndTestError {
    #[error("Variable not in test universe: {name}")]
    UnknownVariable { name: String },

    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Significance level must lie in (0, 1), got {alpha}")]
    InvalidAlpha { alpha: f64 },

    #[error("Insufficient data: {message}")]
    InsufficientData { message: String },
}

impl BlanketErrorCode for IndTestError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownVariable { .. } => error_code::UNKNOWN_VARIABLE,
            Self::DimensionMismatch { .. } => error_code::DIMENSION_MISMATCH,
            Self::InvalidAlpha { .. } => error_code::INVALID_ALPHA,
            Self::InsufficientData { .. } => error_code::INSUFFICIENT_DATA,
        }
    }
}
