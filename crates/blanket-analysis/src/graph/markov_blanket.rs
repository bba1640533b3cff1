//! Markov blankets read off a known DAG.

use petgraph::stable_graph::NodeIndex;

use blanket_core::errors::GraphError;
use blanket_core::types::collections::FxHashSet;

use super::graph::Graph;
use super::node::Node;

/// Parents, children, and parents of children of `target`, in slot order, target excluded.
pub fn markov_blanket(dag: &Graph, target: &Node) -> Result<Vec<Node>, GraphError> {
    let t = dag.index_of(target)?;
    let mut members: FxHashSet<NodeIndex> = FxHashSet::default();
    members.extend(dag.parent_indices(t));
    for child in dag.child_indices(t) {
        members.insert(child);
        members.extend(dag.parent_indices(child));
    }
    members.remove(&t);
    Ok(dag
        .inner
        .node_indices()
        .filter(|i| members.contains(i))
        .map(|i| dag.node_at(i).clone())
        .collect())
}

/// Subgraph of `dag` induced on `target` and its Markov blanket.
pub fn markov_blanket_dag(dag: &Graph, target: &Node) -> Result<Graph, GraphError> {
    let mut nodes = markov_blanket(dag, target)?;
    nodes.push(target.clone());
    dag.subgraph(&nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node_names;

    #[test]
    fn blanket_includes_spouses_only_through_children() {
        let g = Graph::from_spec("P-->T,T-->C,S-->C,G-->P,C-->D,U").unwrap();
        let mb = markov_blanket(&g, &Node::new("T")).unwrap();
        assert_eq!(node_names(&mb), vec!["C", "P", "S"]);
        let dag = markov_blanket_dag(&g, &Node::new("T")).unwrap();
        assert_eq!(dag.num_nodes(), 4);
        assert_eq!(dag.num_edges(), 3);
    }

    #[test]
    fn isolated_target_has_empty_blanket() {
        let g = Graph::from_spec("A-->B,T").unwrap();
        assert!(markov_blanket(&g, &Node::new("T")).unwrap().is_empty());
    }
}
