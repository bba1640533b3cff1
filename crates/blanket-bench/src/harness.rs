//! Supervised evaluation of Markov blanket searches against known DAGs.
//!
//! Each trial draws a target whose true blanket is large enough, runs every configured
//! search on its own worker thread under a wall-clock budget, and scores the result.
//! A search that outlives its budget is cancelled cooperatively and recorded as abandoned.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use blanket_analysis::graph::{markov_blanket, Graph, Node};
use blanket_analysis::indtest::{DSeparationTest, IndependenceTest};
use blanket_analysis::mb::{self, MbSearch, SearchOptions};
use blanket_core::errors::{HarnessError, SearchError};
use blanket_core::types::MbAlgorithm;
use blanket_core::{BlanketConfig, CancelToken, FxHashSet};

use crate::fixtures::{oracle_fixture, random_model_dag, simulated_fixture, Fixture};
use crate::report::EvaluationReport;

/// Random draws per graph before giving up on finding an unused, large enough target.
const MAX_TARGET_TRIES: usize = 30;
/// Fresh graphs in a row that may fail to offer a target before the run is aborted.
const MAX_FRESH_GRAPHS: usize = 10;
/// How long the supervisor waits past the budget before tripping the token itself.
const SUPERVISOR_GRACE: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Set differences between an estimated and a true blanket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub false_positives: usize,
    pub false_negatives: usize,
    /// `false_positives + false_negatives`.
    pub errors: usize,
    /// True members that were found.
    pub correct: usize,
    /// Size of the true blanket.
    pub truth: usize,
}

impl Score {
    /// Compares by name, so nodes from different graphs over the same variables match.
    pub fn compare(estimated: &[Node], truth: &[Node]) -> Self {
        let est: FxHashSet<&str> = estimated.iter().map(Node::name).collect();
        let tru: FxHashSet<&str> = truth.iter().map(Node::name).collect();
        let false_positives = est.difference(&tru).count();
        let false_negatives = tru.difference(&est).count();
        Self {
            false_positives,
            false_negatives,
            errors: false_positives + false_negatives,
            correct: tru.len() - false_negatives,
            truth: tru.len(),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.errors == 0
    }
}

/// One completed search in one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialStats {
    pub trial: usize,
    pub algorithm: MbAlgorithm,
    pub target: String,
    #[serde(flatten)]
    pub score: Score,
    pub elapsed_us: u64,
    pub num_tests: usize,
}

/// A search that ran out of budget. Its partial work is not scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbandonedRun {
    pub trial: usize,
    pub algorithm: MbAlgorithm,
    pub target: String,
    pub elapsed_us: u64,
    pub num_tests: usize,
}

/// Outcome of one supervised search.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed {
        blanket: Vec<Node>,
        elapsed: Duration,
        num_tests: usize,
    },
    Abandoned {
        elapsed: Duration,
        num_tests: usize,
    },
}

// ---------------------------------------------------------------------------
// Supervised runs
// ---------------------------------------------------------------------------

/// Runs `algorithm` for `target` on a worker thread, cancelling it once `budget` lapses.
///
/// The worker polls its token at every independence test, so after cancellation the
/// supervisor waits for it to wind down rather than detaching it.
pub fn run_with_budget(
    algorithm: MbAlgorithm,
    test: Arc<dyn IndependenceTest>,
    options: SearchOptions,
    target: &str,
    budget: Duration,
) -> Result<RunOutcome, HarnessError> {
    let token = CancelToken::with_budget(budget);
    let mut search = mb::build(algorithm, test, options.with_cancel(token.clone()));
    let (tx, rx) = crossbeam_channel::bounded(1);
    let target_name = target.to_string();

    let worker = thread::Builder::new()
        .name(format!("mb-{}", algorithm.name()))
        .spawn(move || {
            let result = search.find_mb(&target_name);
            let _ = tx.send((result, search.elapsed(), search.num_independence_tests()));
        })
        .map_err(|e| HarnessError::Spawn {
            algorithm: algorithm.name().to_string(),
            message: e.to_string(),
        })?;

    let message = match rx.recv_timeout(budget.saturating_add(SUPERVISOR_GRACE)) {
        Ok(message) => Ok(message),
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(algorithm = algorithm.name(), target_node = target, ?budget, "budget exceeded, cancelling");
            token.cancel();
            rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
        }
        Err(e) => Err(e),
    };
    let _ = worker.join();
    let (result, elapsed, num_tests) = message.map_err(|_| HarnessError::WorkerLost {
        algorithm: algorithm.name().to_string(),
    })?;

    match result {
        Ok(blanket) => Ok(RunOutcome::Completed {
            blanket,
            elapsed,
            num_tests,
        }),
        Err(SearchError::Abandoned { tests, elapsed }) => Ok(RunOutcome::Abandoned {
            elapsed,
            num_tests: tests,
        }),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Target selection
// ---------------------------------------------------------------------------

/// Draws a node of `dag` whose blanket has at least `min_mb_size` members and which is
/// not in `used`. Returns the target with its true blanket, or `None` once the draws run out.
pub fn pick_target<R: Rng + ?Sized>(
    dag: &Graph,
    min_mb_size: usize,
    used: &FxHashSet<String>,
    rng: &mut R,
) -> Result<Option<(Node, Vec<Node>)>, HarnessError> {
    let nodes = dag.nodes();
    if nodes.is_empty() {
        return Ok(None);
    }
    let mut visited = FxHashSet::default();
    let mut tried = 0;
    while tried <= MAX_TARGET_TRIES {
        let i = rng.gen_range(0..nodes.len());
        if visited.contains(&i) || used.contains(nodes[i].name()) {
            tried += 1;
            continue;
        }
        let blanket = markov_blanket(dag, &nodes[i])?;
        if blanket.len() < min_mb_size {
            visited.insert(i);
            continue;
        }
        return Ok(Some((nodes[i].clone(), blanket)));
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Trials
// ---------------------------------------------------------------------------

/// Runs `simulation.num_trials` trials over simulated data and summarizes them.
pub fn run_evaluation(config: &BlanketConfig) -> Result<EvaluationReport, HarnessError> {
    let sim = &config.simulation;
    let alpha = config.search.effective_alpha();
    run_trials(config, |rng| {
        let dag = random_model_dag(sim, rng);
        simulated_fixture(dag, sim, alpha, rng)
    })
}

/// Same trial loop as [`run_evaluation`], with the d-separation oracle in place of data.
pub fn run_oracle_evaluation(config: &BlanketConfig) -> Result<EvaluationReport, HarnessError> {
    let sim = &config.simulation;
    run_trials(config, |rng| Ok(oracle_fixture(random_model_dag(sim, rng))))
}

fn run_trials<F>(config: &BlanketConfig, mut make_fixture: F) -> Result<EvaluationReport, HarnessError>
where
    F: FnMut(&mut ChaCha8Rng) -> Result<Fixture, HarnessError>,
{
    let sim = &config.simulation;
    let algorithms = sim.effective_algorithms();
    let options = SearchOptions::from_config(&config.search);
    let budget = config.search.effective_time_limit();
    let min_mb_size = sim.effective_min_mb_size();
    let mut rng = ChaCha8Rng::seed_from_u64(sim.effective_seed());

    let mut fixture: Option<Fixture> = None;
    let mut used: FxHashSet<String> = FxHashSet::default();
    let mut fresh_graphs = 0;
    let mut trials = Vec::new();
    let mut abandoned = Vec::new();

    let mut trial = 0;
    while trial < sim.effective_num_trials() {
        if fixture.is_none() || sim.effective_random_graph_every_time() {
            fixture = Some(make_fixture(&mut rng)?);
        }
        let Some(current) = fixture.as_ref() else {
            break;
        };

        let Some((target, truth)) = pick_target(&current.dag, min_mb_size, &used, &mut rng)? else {
            fresh_graphs += 1;
            if fresh_graphs > MAX_FRESH_GRAPHS {
                return Err(HarnessError::NoEligibleTarget {
                    min_mb_size,
                    graphs: fresh_graphs,
                });
            }
            tracing::info!(trial, min_mb_size, "no eligible target, drawing a new graph");
            fixture = None;
            used.clear();
            continue;
        };
        fresh_graphs = 0;
        used.insert(target.name().to_string());
        used.extend(truth.iter().map(|n| n.name().to_string()));
        tracing::info!(trial, target_node = %target, truth = truth.len(), "trial started");

        for &algorithm in &algorithms {
            let outcome = run_with_budget(algorithm, Arc::clone(&current.test), options.clone(), target.name(), budget)?;
            match outcome {
                RunOutcome::Completed {
                    blanket,
                    elapsed,
                    num_tests,
                } => {
                    let score = Score::compare(&blanket, &truth);
                    tracing::debug!(
                        trial,
                        algorithm = algorithm.name(),
                        false_positives = score.false_positives,
                        false_negatives = score.false_negatives,
                        "scored"
                    );
                    trials.push(TrialStats {
                        trial,
                        algorithm,
                        target: target.name().to_string(),
                        score,
                        elapsed_us: micros(elapsed),
                        num_tests,
                    });
                }
                RunOutcome::Abandoned { elapsed, num_tests } => {
                    abandoned.push(AbandonedRun {
                        trial,
                        algorithm,
                        target: target.name().to_string(),
                        elapsed_us: micros(elapsed),
                        num_tests,
                    });
                }
            }
        }
        trial += 1;
    }

    Ok(EvaluationReport::new(config, &algorithms, trials, abandoned))
}

// ---------------------------------------------------------------------------
// All-targets sweep
// ---------------------------------------------------------------------------

/// Score of one search for one target of a sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetScore {
    pub target: String,
    #[serde(flatten)]
    pub score: Score,
    pub num_tests: usize,
}

/// Runs `algorithm` for every node of `dag` against one shared d-separation oracle, one
/// search per target in parallel. Results come back in node order.
pub fn sweep_all_targets(
    dag: &Graph,
    algorithm: MbAlgorithm,
    options: &SearchOptions,
) -> Result<Vec<TargetScore>, HarnessError> {
    let test: Arc<dyn IndependenceTest> = Arc::new(DSeparationTest::new(dag.clone()));
    let nodes = dag.nodes();
    let scores = nodes
        .par_iter()
        .map(|target| -> Result<TargetScore, HarnessError> {
            let mut search = mb::build(algorithm, Arc::clone(&test), options.clone());
            let found = search.find_mb(target.name())?;
            let truth = markov_blanket(dag, target)?;
            Ok(TargetScore {
                target: target.name().to_string(),
                score: Score::compare(&found, &truth),
                num_tests: search.num_independence_tests(),
            })
        })
        .collect::<Result<Vec<_>, HarnessError>>()?;

    let exact = scores.iter().filter(|s| s.score.is_exact()).count();
    tracing::info!(algorithm = algorithm.name(), targets = scores.len(), exact, "sweep finished");
    Ok(scores)
}

/// Whole microseconds in `elapsed`, saturating at `u64::MAX`.
fn micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<Node> {
        names.iter().map(|n| Node::new(*n)).collect()
    }

    #[test]
    fn elapsed_micros_saturate() {
        assert_eq!(micros(Duration::from_micros(1_500)), 1_500);
        assert_eq!(micros(Duration::MAX), u64::MAX);
    }

    #[test]
    fn score_counts_both_directions() {
        let score = Score::compare(&named(&["A", "B", "E"]), &named(&["A", "B", "C", "D"]));
        assert_eq!(score.false_positives, 1);
        assert_eq!(score.false_negatives, 2);
        assert_eq!(score.errors, 3);
        assert_eq!(score.correct, 2);
        assert_eq!(score.truth, 4);
        assert!(!score.is_exact());
    }

    #[test]
    fn empty_estimate_misses_everything() {
        let score = Score::compare(&[], &named(&["A", "B"]));
        assert_eq!(score, Score { false_positives: 0, false_negatives: 2, errors: 2, correct: 0, truth: 2 });
    }

    #[test]
    fn pick_target_respects_min_size_and_used() {
        let dag = Graph::from_spec("A-->T,B-->T,T-->C,D-->C").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let used = FxHashSet::default();
        let (target, truth) = pick_target(&dag, 4, &used, &mut rng).unwrap().unwrap();
        assert_eq!(target.name(), "T");
        assert_eq!(truth.len(), 4);

        let used: FxHashSet<String> = ["T".to_string()].into_iter().collect();
        assert!(pick_target(&dag, 4, &used, &mut rng).unwrap().is_none());
    }
}
