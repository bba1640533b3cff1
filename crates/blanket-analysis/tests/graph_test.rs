//! Graph integration tests: d-separation witnesses, triple bookkeeping, comparison
//! scores, and true Markov blankets.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use blanket_analysis::graph::{
    adjacency_errors, markov_blanket, markov_blanket_dag, node_names, random_dag, two_cycle_errors, Graph, Node,
    NodeEquality, RandomGraphParams, Triple,
};

fn n(name: &str) -> Node {
    Node::new(name)
}

// ---------------------------------------------------------------------------
// d-separation
// ---------------------------------------------------------------------------

#[test]
fn sepset_witnesses_every_nonadjacent_pair() {
    let g = Graph::from_spec("A-->B,B-->C,A-->D,D-->C,C-->E,F-->E,G").unwrap();
    let nodes = g.nodes();
    for (i, x) in nodes.iter().enumerate() {
        for y in &nodes[i + 1..] {
            let sepset = g.sepset(x, y).unwrap();
            if g.is_adjacent(x, y).unwrap() {
                assert!(sepset.is_none(), "{x} and {y} are adjacent");
            } else {
                let z = sepset.unwrap_or_else(|| panic!("no witness for {x}, {y}"));
                assert!(g.is_d_separated_from(x, y, &z).unwrap());
            }
        }
    }
}

#[test]
fn descendant_of_collider_opens_path() {
    let g = Graph::from_spec("A-->C,B-->C,C-->D").unwrap();
    assert!(g.is_d_separated_from(&n("A"), &n("B"), &[]).unwrap());
    assert!(g.is_d_connected_to(&n("A"), &n("B"), &[n("D")]).unwrap());
    assert!(g.is_d_connected_to(&n("A"), &n("B"), &[n("C")]).unwrap());
}

#[test]
fn unknown_node_is_an_error() {
    let g = Graph::from_spec("A-->B").unwrap();
    assert!(g.is_d_connected_to(&n("A"), &n("Q"), &[]).is_err());
    assert!(g.is_d_separated_from(&n("A"), &n("B"), &[n("Q")]).is_err());
}

// ---------------------------------------------------------------------------
// Triples
// ---------------------------------------------------------------------------

#[test]
fn removing_a_node_drops_its_triples_only() {
    let mut g = Graph::from_spec("A---B,B---C,C---D").unwrap();
    g.add_ambiguous_triple(&n("A"), &n("B"), &n("C")).unwrap();
    g.add_underline_triple(&n("B"), &n("C"), &n("D")).unwrap();

    g.remove_node(&n("A")).unwrap();
    assert!(g.ambiguous_triples().is_empty());
    assert!(g.is_underline_triple(&n("B"), &n("C"), &n("D")));
}

#[test]
fn triple_needs_both_adjacencies() {
    let mut g = Graph::from_spec("A---B,C").unwrap();
    assert!(g.add_ambiguous_triple(&n("A"), &n("B"), &n("C")).is_err());
    assert!(g.ambiguous_triples().is_empty());
}

#[test]
fn subgraph_keeps_contained_triples() {
    let mut g = Graph::from_spec("A---B,B---C,C---D").unwrap();
    g.add_ambiguous_triple(&n("A"), &n("B"), &n("C")).unwrap();
    g.add_ambiguous_triple(&n("B"), &n("C"), &n("D")).unwrap();
    let sub = g.subgraph(&[n("A"), n("B"), n("C")]).unwrap();
    assert_eq!(sub.ambiguous_triples(), vec![Triple::new(&n("A"), &n("B"), &n("C"))]);
    assert_eq!(sub.num_edges(), 2);
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[test]
fn two_cycle_regression_scores() {
    let truth = Graph::from_spec("X1-->X2,X2-->X1,X3-->X4,X4-->X3").unwrap();
    let estimated = Graph::from_spec("X1-->X2,X2-->X1,X2-->X3,X3-->X2,X4-->X5,X5-->X4").unwrap();
    let errors = two_cycle_errors(&truth, &estimated, NodeEquality::Name);
    assert_eq!(errors.correct, 1);
    assert_eq!(errors.false_positives, 2);
    assert_eq!(errors.false_negatives, 1);
}

#[test]
fn adjacency_scores_ignore_orientation() {
    let truth = Graph::from_spec("A-->B,B-->C,C-->D").unwrap();
    let estimated = Graph::from_spec("B---A,C<->B,A-->D").unwrap();
    let errors = adjacency_errors(&truth, &estimated, NodeEquality::Name);
    assert_eq!(errors.correct, 2);
    assert_eq!(errors.false_positives, 1);
    assert_eq!(errors.false_negatives, 1);
}

// ---------------------------------------------------------------------------
// True Markov blankets
// ---------------------------------------------------------------------------

#[test]
fn blanket_screens_off_the_rest_of_a_random_dag() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let dag = random_dag(&RandomGraphParams::new(20, 1.5), &mut rng);
    for target in dag.nodes() {
        let mb = markov_blanket(&dag, &target).unwrap();
        for other in dag.nodes() {
            if other == target || mb.contains(&other) {
                continue;
            }
            assert!(
                dag.is_d_separated_from(&target, &other, &mb).unwrap(),
                "{other} not screened off from {target}"
            );
        }
    }
}

#[test]
fn blanket_dag_is_induced() {
    let dag = Graph::from_spec("P-->T,T-->C,S-->C,P-->S,C-->D").unwrap();
    let sub = markov_blanket_dag(&dag, &n("T")).unwrap();
    assert_eq!(node_names(&sub.nodes()), vec!["C", "P", "S", "T"]);
    assert_eq!(sub.num_edges(), 4);
    assert!(sub.is_parent_of(&n("P"), &n("S")).unwrap());
}
