//! Tabular samples and the simulators that produce them.

pub mod dataset;
pub mod sem;

pub use dataset::{ContinuousDataSet, DiscreteDataSet};
pub use sem::LinearSem;
