//! d-separation oracle over a known graph.

use blanket_core::errors::IndTestError;

use super::{IndependenceResult, IndependenceTest};
use crate::graph::{Graph, Node};

/// Independent exactly when d-separated: p = 1 when independent, 0 otherwise.
/// Latent nodes are left out of the test universe.
#[derive(Debug, Clone)]
pub struct DSeparationTest {
    graph: Graph,
    variables: Vec<Node>,
    alpha: f64,
}

impl DSeparationTest {
    pub fn new(graph: Graph) -> Self {
        let variables = graph.nodes().into_iter().filter(|n| !n.is_latent()).collect();
        Self {
            graph,
            variables,
            alpha: 0.05,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    fn known(&self, node: &Node) -> Result<(), IndTestError> {
        if self.variables.contains(node) {
            Ok(())
        } else {
            Err(IndTestError::UnknownVariable {
                name: node.name().to_string(),
            })
        }
    }
}

impl IndependenceTest for DSeparationTest {
    fn check(&self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, IndTestError> {
        self.known(x)?;
        self.known(y)?;
        for node in z {
            self.known(node)?;
        }
        let separated = self
            .graph
            .is_d_separated_from(x, y, z)
            .map_err(|e| IndTestError::UnknownVariable { name: e.to_string() })?;
        Ok(if separated {
            IndependenceResult::independent(1.0, 0.0)
        } else {
            IndependenceResult::dependent(0.0, 1.0)
        })
    }

    fn variables(&self) -> &[Node] {
        &self.variables
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn name(&self) -> &str {
        "D-separation"
    }
}
