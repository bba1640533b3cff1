//! # blanket-analysis
//!
//! Analysis engine for blanket.
//! Contains mixed graphs with d-separation, conditional independence tests,
//! data simulation, and the Markov blanket searches.

#![allow(clippy::module_inception)]

pub mod bayes;
pub mod combinatorics;
pub mod data;
pub mod graph;
pub mod indtest;
pub mod mb;
