//! # blanket-bench
//!
//! Evaluation harness for the Markov blanket searches: random models and the tests built
//! over them, supervised trial runs with per-search budgets, and report rendering.

pub mod fixtures;
pub mod harness;
pub mod report;
