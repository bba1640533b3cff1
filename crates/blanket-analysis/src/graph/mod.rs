//! Mixed graphs: nodes, edges, triples, d-separation, cycles, and orientation rules.

pub mod comparison;
mod convert;
mod cycles;
mod dsep;
pub mod edge;
pub mod generators;
#[allow(clippy::module_inception)]
pub mod graph;
pub mod knowledge;
pub mod markov_blanket;
pub mod meek;
pub mod node;
pub mod triple;

pub use comparison::{adjacency_errors, two_cycle_errors, AdjacencyErrors, TwoCycleErrors};
pub use edge::{Edge, Endpoint};
pub use generators::{random_dag, RandomGraphParams};
pub use graph::{Graph, TripleKind};
pub use knowledge::Knowledge;
pub use markov_blanket::{markov_blanket, markov_blanket_dag};
pub use meek::MeekRules;
pub use node::{node_names, Node, NodeEquality, NodeType};
pub use triple::Triple;
