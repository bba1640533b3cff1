//! Random DAG generation.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::graph::Graph;
use super::node::{Node, NodeType};

/// Shape constraints for [`random_dag`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomGraphParams {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub num_latents: usize,
    pub max_degree: usize,
    pub max_indegree: usize,
    pub max_outdegree: usize,
}

impl RandomGraphParams {
    /// `num_nodes` nodes and `edge_multiplier * num_nodes` edges, loosely bounded degrees.
    pub fn new(num_nodes: usize, edge_multiplier: f64) -> Self {
        Self {
            num_nodes,
            num_edges: (edge_multiplier * num_nodes as f64).round() as usize,
            num_latents: 0,
            max_degree: 10,
            max_indegree: 10,
            max_outdegree: 10,
        }
    }
}

/// Nodes are named `X1..Xn`. Edges follow a random causal order, so the result is acyclic.
/// Fewer than `num_edges` edges are placed when the degree bounds leave no room.
pub fn random_dag<R: Rng + ?Sized>(params: &RandomGraphParams, rng: &mut R) -> Graph {
    let n = params.num_nodes;
    let mut nodes: Vec<Node> = (1..=n).map(|i| Node::new(format!("X{i}"))).collect();
    let mut latent_slots: Vec<usize> = (0..n).collect();
    latent_slots.shuffle(rng);
    for &slot in latent_slots.iter().take(params.num_latents.min(n)) {
        nodes[slot] = nodes[slot].clone().with_type(NodeType::Latent);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let mut rank = vec![0usize; n];
    for (pos, &slot) in order.iter().enumerate() {
        rank[slot] = pos;
    }

    let mut graph = Graph::with_nodes(nodes.iter().cloned());
    if n < 2 {
        return graph;
    }
    let mut indegree = vec![0usize; n];
    let mut outdegree = vec![0usize; n];
    let max_edges = n * (n - 1) / 2;
    let target = params.num_edges.min(max_edges);
    let mut placed = 0;
    let mut attempts = 0;
    while placed < target && attempts < 50 * max_edges.max(1) {
        attempts += 1;
        let a = rng.gen_range(0..n);
        let b = rng.gen_range(0..n);
        if a == b {
            continue;
        }
        let (from, to) = if rank[a] < rank[b] { (a, b) } else { (b, a) };
        if outdegree[from] >= params.max_outdegree
            || indegree[to] >= params.max_indegree
            || indegree[from] + outdegree[from] >= params.max_degree
            || indegree[to] + outdegree[to] >= params.max_degree
        {
            continue;
        }
        if matches!(graph.is_adjacent(&nodes[from], &nodes[to]), Ok(true)) {
            continue;
        }
        if let Ok(true) = graph.add_directed_edge(&nodes[from], &nodes[to]) {
            outdegree[from] += 1;
            indegree[to] += 1;
            placed += 1;
        }
    }
    tracing::debug!(nodes = n, edges = placed, requested = params.num_edges, "generated random DAG");
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn acyclic_with_requested_edges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let g = random_dag(&RandomGraphParams::new(30, 1.0), &mut rng);
        assert_eq!(g.num_nodes(), 30);
        assert_eq!(g.num_edges(), 30);
        assert!(!g.exists_directed_cycle());
    }

    #[test]
    fn same_seed_same_graph() {
        let params = RandomGraphParams::new(15, 1.5);
        let a = random_dag(&params, &mut ChaCha8Rng::seed_from_u64(3));
        let b = random_dag(&params, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
