//! Bayes net parameter carry-over when the graph changes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use blanket_analysis::bayes::{BayesIm, BayesPm, Initialization};
use blanket_analysis::graph::{Graph, Node};
use blanket_core::errors::SimulationError;

const BASE: &str = "X1-->X2,X2-->X3,X3-->X4,X5";
const WITH_EXTRA_PARENT: &str = "X1-->X2,X2-->X3,X3-->X4,X5-->X3";

fn base_model(rng: &mut ChaCha8Rng) -> BayesIm {
    let mut pm = BayesPm::new(Graph::from_spec(BASE).unwrap()).unwrap();
    for (name, count) in [("X1", 2), ("X2", 3), ("X3", 4), ("X4", 2), ("X5", 3)] {
        pm.set_num_categories(&Node::new(name), count).unwrap();
    }
    BayesIm::new(pm, Initialization::Random, rng).unwrap()
}

fn reparameterize(spec: &str, old: &BayesIm, rng: &mut ChaCha8Rng) -> BayesIm {
    let pm = BayesPm::from_previous(Graph::from_spec(spec).unwrap(), old.pm()).unwrap();
    BayesIm::from_previous(pm, old, Initialization::Manual, rng).unwrap()
}

fn index(im: &BayesIm, name: &str) -> usize {
    im.node_index(&Node::new(name)).unwrap()
}

// ---------------------------------------------------------------------------
// Carry-over
// ---------------------------------------------------------------------------

#[test]
fn new_parent_clears_only_the_child_table() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let base = base_model(&mut rng);
    assert!(!base.is_incomplete());

    let grown = reparameterize(WITH_EXTRA_PARENT, &base, &mut rng);
    let x3 = index(&grown, "X3");
    assert!(grown.is_table_unspecified(x3));
    assert_eq!(grown.num_rows(x3), 9);
    assert_eq!(grown.num_columns(x3), 4);

    for name in ["X1", "X2", "X4", "X5"] {
        let (old, new) = (index(&base, name), index(&grown, name));
        assert_eq!(base.table(old), grown.table(new), "{name} should be carried over");
    }
}

#[test]
fn dropping_the_parent_again_leaves_child_unspecified() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let base = base_model(&mut rng);
    let grown = reparameterize(WITH_EXTRA_PARENT, &base, &mut rng);
    let shrunk = reparameterize(BASE, &grown, &mut rng);

    let x3 = index(&shrunk, "X3");
    assert!(shrunk.is_table_unspecified(x3));
    assert_eq!(shrunk.num_rows(x3), 3);
    for name in ["X1", "X2", "X4", "X5"] {
        let (old, new) = (index(&base, name), index(&shrunk, name));
        assert_eq!(base.table(old), shrunk.table(new));
    }
}

#[test]
fn category_counts_survive_graph_edits() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let base = base_model(&mut rng);
    let grown = reparameterize(WITH_EXTRA_PARENT, &base, &mut rng);
    assert_eq!(grown.pm().num_categories(&Node::new("X3")).unwrap(), 4);
    assert_eq!(grown.pm().num_categories(&Node::new("X5")).unwrap(), 3);
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[test]
fn unspecified_tables_refuse_to_simulate() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let base = base_model(&mut rng);
    let grown = reparameterize(WITH_EXTRA_PARENT, &base, &mut rng);
    assert!(grown.is_incomplete());
    assert!(matches!(
        grown.simulate(10, &mut rng),
        Err(SimulationError::UnspecifiedTable { ref node }) if node == "X3"
    ));
}

#[test]
fn simulated_values_respect_category_counts() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let base = base_model(&mut rng);
    let data = base.simulate(500, &mut rng).unwrap();
    assert_eq!(data.num_rows(), 500);
    assert_eq!(data.num_columns(), 5);
    for column in 0..data.num_columns() {
        let categories = data.num_categories(column);
        assert!((0..data.num_rows()).all(|row| data.value(row, column) < categories));
    }
}

#[test]
fn random_rows_are_distributions() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let base = base_model(&mut rng);
    for node in 0..base.num_nodes() {
        for row in base.table(node) {
            let total: f64 = row.iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }
}
