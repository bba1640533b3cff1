//! Shared value types.

pub mod algorithm;
pub mod collections;
pub mod depth;
pub mod policy;

pub use algorithm::MbAlgorithm;
pub use depth::Depth;
pub use policy::UndeterminedPolicy;
