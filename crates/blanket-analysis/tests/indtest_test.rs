//! Independence tests against simulated and hand-built data.

use std::sync::Arc;

use ndarray::Array2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use blanket_analysis::bayes::{BayesIm, BayesPm, Initialization};
use blanket_analysis::data::{DiscreteDataSet, LinearSem};
use blanket_analysis::graph::{Graph, Node};
use blanket_analysis::indtest::{DSeparationTest, FisherZTest, GSquareTest, IndependenceTest, Outcome};
use blanket_core::errors::IndTestError;

fn n(name: &str) -> Node {
    Node::new(name)
}

// ---------------------------------------------------------------------------
// Oracle
// ---------------------------------------------------------------------------

#[test]
fn oracle_agrees_with_graph() {
    let g = Graph::from_spec("A-->B,B-->C,D-->C").unwrap();
    let test = DSeparationTest::new(g.clone());
    for (x, y, z) in [
        ("A", "C", vec![]),
        ("A", "C", vec!["B"]),
        ("A", "D", vec![]),
        ("A", "D", vec!["C"]),
        ("B", "D", vec!["C"]),
    ] {
        let z: Vec<Node> = z.into_iter().map(n).collect();
        let result = test.check(&n(x), &n(y), &z).unwrap();
        assert_eq!(result.is_independent(), g.is_d_separated_from(&n(x), &n(y), &z).unwrap());
        assert_ne!(result.outcome, Outcome::Undetermined);
    }
}

#[test]
fn oracle_is_shareable_across_threads() {
    let g = Graph::from_spec("A-->B,B-->C").unwrap();
    let test: Arc<dyn IndependenceTest> = Arc::new(DSeparationTest::new(g));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let test = Arc::clone(&test);
            std::thread::spawn(move || test.check(&n("A"), &n("C"), &[n("B")]).unwrap().is_independent())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

// ---------------------------------------------------------------------------
// Fisher Z
// ---------------------------------------------------------------------------

#[test]
fn fisher_z_on_simulated_chain() {
    let dag = Graph::from_spec("X1-->X2,X2-->X3").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let sem = LinearSem::random(&dag, &mut rng).unwrap();
    let data = sem.simulate(&dag, 4000, &mut rng).unwrap();
    let test = FisherZTest::from_dataset(&data, 0.01).unwrap();

    assert!(test.check(&n("X1"), &n("X2"), &[]).unwrap().is_dependent());
    assert!(test.check(&n("X2"), &n("X3"), &[n("X1")]).unwrap().is_dependent());
    let r = test.partial_correlation(&n("X1"), &n("X3"), &[n("X2")]).unwrap().unwrap();
    assert!(r.abs() < 0.1, "partial correlation {r}");
    assert_eq!(test.sample_size(), 4000);
}

#[test]
fn fisher_z_rejects_unknown_variable() {
    let dag = Graph::from_spec("A-->B").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let data = LinearSem::random(&dag, &mut rng).unwrap().simulate(&dag, 50, &mut rng).unwrap();
    let test = FisherZTest::from_dataset(&data, 0.05).unwrap();
    assert!(matches!(
        test.check(&n("A"), &n("Z"), &[]),
        Err(IndTestError::UnknownVariable { .. })
    ));
}

// ---------------------------------------------------------------------------
// G-square
// ---------------------------------------------------------------------------

fn balanced(columns: usize, rows: &[&[usize]]) -> DiscreteDataSet {
    let flat: Vec<usize> = rows.iter().flat_map(|r| r.iter().copied()).collect();
    let data = Array2::from_shape_vec((rows.len(), columns), flat).unwrap();
    let names = ["A", "B", "C"];
    let variables = names[..columns].iter().map(|s| n(s)).collect();
    DiscreteDataSet::new(variables, data, vec![2; columns]).unwrap()
}

#[test]
fn g_square_balanced_table_is_independent() {
    let data = balanced(2, &[&[0, 0], &[0, 1], &[1, 0], &[1, 1]]);
    let test = GSquareTest::new(data, 0.05).unwrap();
    let stat = test.statistic(&n("A"), &n("B"), &[]).unwrap();
    assert!(stat.g_square.abs() < 1e-12);
    assert_eq!(stat.degrees_of_freedom, 1);
    assert!(test.check(&n("A"), &n("B"), &[]).unwrap().is_independent());
}

#[test]
fn g_square_strata_add_degrees_of_freedom() {
    let table = [
        [0, 0, 0],
        [0, 1, 0],
        [1, 0, 0],
        [1, 1, 0],
        [0, 0, 1],
        [0, 1, 1],
        [1, 0, 1],
        [1, 1, 1],
    ];
    let rows: Vec<&[usize]> = table.iter().map(|r| &r[..]).collect();
    let test = GSquareTest::new(balanced(3, &rows), 0.05).unwrap();
    let stat = test.statistic(&n("A"), &n("B"), &[n("C")]).unwrap();
    assert_eq!(stat.degrees_of_freedom, 2);
}

#[test]
fn g_square_on_simulated_bayes_net() {
    let dag = Graph::from_spec("X1-->X2,X3").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let pm = BayesPm::new(dag).unwrap();
    let mut im = BayesIm::new(pm, Initialization::Random, &mut rng).unwrap();
    let x1 = im.node_index(&n("X1")).unwrap();
    let x2 = im.node_index(&n("X2")).unwrap();
    im.set_probability(x1, 0, 0, 0.5);
    im.set_probability(x1, 0, 1, 0.5);
    im.set_probability(x2, 0, 0, 0.9);
    im.set_probability(x2, 0, 1, 0.1);
    im.set_probability(x2, 1, 0, 0.1);
    im.set_probability(x2, 1, 1, 0.9);

    let data = im.simulate(2000, &mut rng).unwrap();
    let test = GSquareTest::new(data, 0.01).unwrap();
    assert!(test.check(&n("X1"), &n("X2"), &[]).unwrap().is_dependent());
    assert_eq!(test.variables().len(), 3);
}

#[test]
fn bad_alpha_is_rejected() {
    let data = balanced(2, &[&[0, 0], &[1, 1]]);
    assert!(matches!(
        GSquareTest::new(data, 1.5),
        Err(IndTestError::InvalidAlpha { .. })
    ));
}
