//! Conditioning set size bound.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound on the size of conditioning sets.
///
/// Configured as an integer: `-1` means unbounded, any non-negative value is a cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Depth {
    Unbounded,
    Max(usize),
}

impl Depth {
    /// Largest conditioning set size allowed when `available` candidates exist.
    pub fn limit(self, available: usize) -> usize {
        match self {
            Depth::Unbounded => available,
            Depth::Max(max) => max.min(available),
        }
    }

    /// Whether a conditioning set of `size` is within the bound.
    pub fn allows(self, size: usize) -> bool {
        match self {
            Depth::Unbounded => true,
            Depth::Max(max) => size <= max,
        }
    }
}

impl Default for Depth {
    fn default() -> Self {
        Depth::Max(3)
    }
}

impl TryFrom<i64> for Depth {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Depth::Unbounded),
            v if v >= 0 => Ok(Depth::Max(v as usize)),
            v => Err(format!("depth must be -1 or non-negative, got {v}")),
        }
    }
}

impl From<Depth> for i64 {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Unbounded => -1,
            Depth::Max(max) => max as i64,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", i64::from(*self))
    }
}
