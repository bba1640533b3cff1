//! Discrete Bayes nets: parametric models and instantiated probability tables.

pub mod im;
pub mod pm;

pub use im::{BayesIm, Initialization};
pub use pm::BayesPm;
