//! Random models and the independence tests built over them.
//!
//! Every fixture is driven by one `ChaCha8Rng`, so a seed reproduces the graph, the
//! parameters, and the sample.

use std::sync::Arc;

use rand::Rng;

use blanket_analysis::bayes::{BayesIm, BayesPm, Initialization};
use blanket_analysis::data::LinearSem;
use blanket_analysis::graph::{random_dag, Graph, RandomGraphParams};
use blanket_analysis::indtest::{DSeparationTest, FisherZTest, GSquareTest, IndependenceTest};
use blanket_core::config::SimulationConfig;
use blanket_core::errors::HarnessError;

/// Which independence test a fixture carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// d-separation over the generating DAG.
    Oracle,
    /// Fisher Z over a linear Gaussian sample.
    Continuous,
    /// G-square over a Bayes net sample.
    Discrete,
}

/// A generating DAG and a test whose answers come from it.
#[derive(Clone)]
pub struct Fixture {
    pub dag: Graph,
    pub test: Arc<dyn IndependenceTest>,
    pub kind: DataKind,
}

impl std::fmt::Debug for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixture")
            .field("nodes", &self.dag.num_nodes())
            .field("edges", &self.dag.num_edges())
            .field("test", &self.test.name())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Random DAG shaped by `config`: at most 9 neighbours, 3 parents, 9 children per node.
pub fn random_model_dag<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> Graph {
    let mut params = RandomGraphParams::new(config.effective_num_vars(), config.effective_edge_multiplier());
    params.max_degree = 9;
    params.max_indegree = 3;
    params.max_outdegree = 9;
    random_dag(&params, rng)
}

pub fn oracle_fixture(dag: Graph) -> Fixture {
    let test: Arc<dyn IndependenceTest> = Arc::new(DSeparationTest::new(dag.clone()));
    Fixture {
        dag,
        test,
        kind: DataKind::Oracle,
    }
}

/// Parameterizes `dag` at random, draws `sample_size` rows, and wraps them in the
/// matching statistical test.
pub fn simulated_fixture<R: Rng + ?Sized>(
    dag: Graph,
    config: &SimulationConfig,
    alpha: f64,
    rng: &mut R,
) -> Result<Fixture, HarnessError> {
    let n = config.effective_sample_size();
    if config.effective_discrete() {
        let pm = BayesPm::random(
            dag.clone(),
            config.effective_min_categories(),
            config.effective_max_categories(),
            rng,
        )?;
        let im = BayesIm::new(pm, Initialization::Random, rng)?;
        let data = im.simulate(n, rng)?;
        let test: Arc<dyn IndependenceTest> = Arc::new(GSquareTest::new(data, alpha)?);
        tracing::debug!(nodes = dag.num_nodes(), rows = n, "simulated discrete data");
        Ok(Fixture {
            dag,
            test,
            kind: DataKind::Discrete,
        })
    } else {
        let sem = LinearSem::random(&dag, rng)?;
        let data = sem.simulate(&dag, n, rng)?;
        let test: Arc<dyn IndependenceTest> = Arc::new(FisherZTest::from_dataset(&data, alpha)?);
        tracing::debug!(nodes = dag.num_nodes(), rows = n, "simulated continuous data");
        Ok(Fixture {
            dag,
            test,
            kind: DataKind::Continuous,
        })
    }
}
