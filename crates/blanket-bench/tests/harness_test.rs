//! Supervised runs, target selection, and full trial loops.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use blanket_analysis::graph::{node_names, random_dag, Graph, RandomGraphParams};
use blanket_analysis::indtest::{DSeparationTest, IndependenceTest};
use blanket_analysis::mb::SearchOptions;
use blanket_bench::harness::{run_evaluation, run_oracle_evaluation, run_with_budget, sweep_all_targets, RunOutcome};
use blanket_core::config::{SearchConfig, SimulationConfig};
use blanket_core::errors::HarnessError;
use blanket_core::types::MbAlgorithm;
use blanket_core::{BlanketConfig, BlanketErrorCode, Depth};

const FIXTURE: &str = "P1-->T,P2-->T,T-->C,S-->C,P1-->P2";

fn oracle(spec: &str) -> Arc<dyn IndependenceTest> {
    Arc::new(DSeparationTest::new(Graph::from_spec(spec).unwrap()))
}

fn unbounded() -> SearchOptions {
    SearchOptions::default().with_depth(Depth::Unbounded)
}

fn oracle_config(algorithms: Vec<MbAlgorithm>, trials: usize) -> BlanketConfig {
    BlanketConfig {
        search: SearchConfig {
            depth: Some(Depth::Unbounded),
            time_limit_ms: Some(60_000),
            ..Default::default()
        },
        simulation: SimulationConfig {
            num_vars: Some(20),
            edge_multiplier: Some(1.5),
            num_trials: Some(trials),
            min_mb_size: Some(3),
            seed: Some(7),
            algorithms,
            ..Default::default()
        },
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Supervised runs
// ---------------------------------------------------------------------------

#[test]
fn supervised_run_returns_the_blanket() {
    let outcome = run_with_budget(MbAlgorithm::Iamb, oracle(FIXTURE), unbounded(), "T", Duration::from_secs(60)).unwrap();
    match outcome {
        RunOutcome::Completed { blanket, num_tests, .. } => {
            assert_eq!(node_names(&blanket), vec!["C", "P1", "P2", "S"]);
            assert!(num_tests > 0);
        }
        other => panic!("expected a completed run, got {other:?}"),
    }
}

#[test]
fn exhausted_budget_is_abandoned_not_an_error() {
    for algorithm in MbAlgorithm::ALL {
        let outcome = run_with_budget(algorithm, oracle(FIXTURE), unbounded(), "T", Duration::ZERO).unwrap();
        assert!(matches!(outcome, RunOutcome::Abandoned { .. }), "{algorithm} should be abandoned");
    }
}

#[test]
fn unknown_target_propagates() {
    let err = run_with_budget(MbAlgorithm::GrowShrink, oracle(FIXTURE), unbounded(), "Q", Duration::from_secs(5))
        .unwrap_err();
    assert!(matches!(err, HarnessError::Search(_)));
    assert_eq!(err.error_code(), "SEARCH_UNKNOWN_TARGET");
}

// ---------------------------------------------------------------------------
// Trial loops
// ---------------------------------------------------------------------------

#[test]
fn oracle_trials_are_exact() {
    let algorithms = vec![MbAlgorithm::GrowShrink, MbAlgorithm::Iamb, MbAlgorithm::Pcmb];
    let report = run_oracle_evaluation(&oracle_config(algorithms.clone(), 4)).unwrap();

    assert_eq!(report.trials.len(), 12);
    assert!(report.abandoned.is_empty());
    assert_eq!(report.num_trials(), 4);
    for stats in &report.trials {
        assert!(stats.score.truth >= 3);
        assert!(stats.score.is_exact(), "{} missed on {}", stats.algorithm, stats.target);
    }
    let summarized: Vec<MbAlgorithm> = report.summaries.iter().map(|s| s.algorithm).collect();
    assert_eq!(summarized, algorithms);
    assert!(report.summaries.iter().all(|s| s.runs == 4 && s.mean_errors == 0.0));
}

#[test]
fn same_seed_same_targets() {
    let config = oracle_config(vec![MbAlgorithm::GrowShrink], 3);
    let a = run_oracle_evaluation(&config).unwrap();
    let b = run_oracle_evaluation(&config).unwrap();
    let targets = |r: &blanket_bench::report::EvaluationReport| r.trials.iter().map(|t| t.target.clone()).collect::<Vec<_>>();
    assert_eq!(targets(&a), targets(&b));
}

#[test]
fn impossible_blanket_size_gives_up() {
    let mut config = oracle_config(vec![MbAlgorithm::GrowShrink], 1);
    config.simulation.num_vars = Some(6);
    config.simulation.min_mb_size = Some(50);
    let err = run_oracle_evaluation(&config).unwrap_err();
    assert!(matches!(err, HarnessError::NoEligibleTarget { min_mb_size: 50, .. }));
    assert_eq!(err.error_code(), "HARNESS_NO_ELIGIBLE_TARGET");
}

#[test]
fn simulated_trials_produce_scored_runs() {
    for discrete in [false, true] {
        let config = BlanketConfig {
            search: SearchConfig {
                depth: Some(Depth::Max(2)),
                ..Default::default()
            },
            simulation: SimulationConfig {
                discrete: Some(discrete),
                num_vars: Some(12),
                edge_multiplier: Some(1.2),
                sample_size: Some(300),
                num_trials: Some(2),
                min_mb_size: Some(2),
                algorithms: vec![MbAlgorithm::GrowShrink, MbAlgorithm::HitonMb],
                ..Default::default()
            },
            ..Default::default()
        };
        let report = run_evaluation(&config).unwrap();
        assert_eq!(report.trials.len(), 4);
        assert_eq!(report.settings.discrete, discrete);
        for stats in &report.trials {
            assert!(stats.score.truth >= 2);
            assert_eq!(stats.score.correct + stats.score.false_negatives, stats.score.truth);
        }
    }
}

// ---------------------------------------------------------------------------
// All-targets sweep
// ---------------------------------------------------------------------------

#[test]
fn sweep_covers_every_node_in_order() {
    let dag = Graph::from_spec(FIXTURE).unwrap();
    let scores = sweep_all_targets(&dag, MbAlgorithm::GrowShrink, &unbounded()).unwrap();
    let targets: Vec<&str> = scores.iter().map(|s| s.target.as_str()).collect();
    let expected: Vec<String> = dag.nodes().iter().map(|n| n.name().to_string()).collect();
    assert_eq!(targets, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert!(scores.iter().all(|s| s.score.is_exact()));
}

#[test]
fn sweep_over_random_dag_is_exact() {
    let mut rng = ChaCha8Rng::seed_from_u64(13);
    let dag = random_dag(&RandomGraphParams::new(15, 1.3), &mut rng);
    for algorithm in [MbAlgorithm::Iamb, MbAlgorithm::HitonMbSym] {
        let scores = sweep_all_targets(&dag, algorithm, &unbounded()).unwrap();
        assert_eq!(scores.len(), 15);
        assert!(scores.iter().all(|s| s.score.is_exact()), "{algorithm}");
    }
}

#[test]
fn fan_search_is_mostly_exact_under_the_oracle() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let dag = random_dag(&RandomGraphParams::new(15, 1.0), &mut rng);
    let scores = sweep_all_targets(&dag, MbAlgorithm::Mbfs, &unbounded()).unwrap();
    let exact = scores.iter().filter(|s| s.score.is_exact()).count();
    assert!(exact * 2 > scores.len(), "only {exact} of {} exact", scores.len());
}
