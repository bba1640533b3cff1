//! Compact text form for building graphs: `"P1-->T,T---C,C<->S,Isolated"`.

use blanket_core::errors::GraphError;

use super::edge::{Edge, Endpoint};
use super::graph::Graph;
use super::node::Node;

const CONNECTORS: [(&str, Endpoint, Endpoint); 7] = [
    ("<->", Endpoint::Arrow, Endpoint::Arrow),
    ("-->", Endpoint::Tail, Endpoint::Arrow),
    ("<--", Endpoint::Arrow, Endpoint::Tail),
    ("---", Endpoint::Tail, Endpoint::Tail),
    ("o->", Endpoint::Circle, Endpoint::Arrow),
    ("<-o", Endpoint::Arrow, Endpoint::Circle),
    ("o-o", Endpoint::Circle, Endpoint::Circle),
];

impl Graph {
    /// Parses a comma-separated list of edges and bare node names.
    ///
    /// Nodes are created in order of first mention. Repeated edges are ignored.
    pub fn from_spec(spec: &str) -> Result<Graph, GraphError> {
        let mut graph = Graph::new();
        for item in spec.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let parsed = CONNECTORS
                .iter()
                .find_map(|(token, e1, e2)| item.split_once(token).map(|(l, r)| (l.trim(), r.trim(), *e1, *e2)));
            match parsed {
                Some((left, right, e1, e2)) => {
                    if left.is_empty() || right.is_empty() || left == right {
                        return Err(GraphError::Parse {
                            input: item.to_string(),
                            message: "edge needs two distinct node names".to_string(),
                        });
                    }
                    let (a, b) = (Node::new(left), Node::new(right));
                    graph.add_node(a.clone());
                    graph.add_node(b.clone());
                    graph.add_edge(Edge::new(a, b, e1, e2))?;
                }
                None => {
                    if item.contains(char::is_whitespace) || item.contains('-') {
                        return Err(GraphError::Parse {
                            input: item.to_string(),
                            message: "unrecognized connector".to_string(),
                        });
                    }
                    graph.add_node(Node::new(item));
                }
            }
        }
        Ok(graph)
    }
}
