//! Per-search bookkeeping around an independence test.
//!
//! Every test a search runs goes through a `TestSession`, which polls the cancel token,
//! counts tests, applies the undetermined-result policy, and keeps the wall clock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use blanket_core::errors::SearchError;
use blanket_core::types::UndeterminedPolicy;
use blanket_core::CancelToken;

use crate::graph::Node;
use crate::indtest::{IndependenceResult, IndependenceTest, Outcome};

pub struct TestSession {
    test: Arc<dyn IndependenceTest>,
    policy: UndeterminedPolicy,
    cancel: CancelToken,
    num_tests: usize,
    num_undetermined: usize,
    started: Option<Instant>,
    elapsed: Duration,
}

impl TestSession {
    pub fn new(test: Arc<dyn IndependenceTest>, policy: UndeterminedPolicy, cancel: CancelToken) -> Self {
        Self {
            test,
            policy,
            cancel,
            num_tests: 0,
            num_undetermined: 0,
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn set_cancel_token(&mut self, token: CancelToken) {
        self.cancel = token;
    }

    pub fn test(&self) -> &Arc<dyn IndependenceTest> {
        &self.test
    }

    /// Starts the clock and clears the counters.
    pub fn begin(&mut self) {
        self.num_tests = 0;
        self.num_undetermined = 0;
        self.elapsed = Duration::ZERO;
        self.started = Some(Instant::now());
    }

    /// Stops the clock. Safe to call on error paths.
    pub fn finish(&mut self) -> Duration {
        if let Some(started) = self.started.take() {
            self.elapsed = started.elapsed();
        }
        if self.num_undetermined > 0 {
            warn!(
                test = self.test.name(),
                undetermined = self.num_undetermined,
                policy = ?self.policy,
                "search saw undetermined independence results"
            );
        }
        self.elapsed
    }

    pub fn num_tests(&self) -> usize {
        self.num_tests
    }

    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => started.elapsed(),
            None => self.elapsed,
        }
    }

    pub fn variables(&self) -> Vec<Node> {
        self.test.variables().to_vec()
    }

    pub fn resolve_target(&self, name: &str) -> Result<Node, SearchError> {
        self.test
            .variable(name)
            .cloned()
            .ok_or_else(|| SearchError::UnknownTarget { name: name.to_string() })
    }

    /// Runs one test after polling the cancel token.
    pub fn check(&mut self, x: &Node, y: &Node, z: &[Node]) -> Result<IndependenceResult, SearchError> {
        if self.cancel.is_cancelled() {
            let elapsed = self.elapsed();
            warn!(tests = self.num_tests, ?elapsed, "search abandoned");
            return Err(SearchError::Abandoned {
                tests: self.num_tests,
                elapsed,
            });
        }
        self.num_tests += 1;
        let result = self.test.check(x, y, z)?;
        if result.is_undetermined() {
            self.num_undetermined += 1;
            debug!(x = %x, y = %y, given = z.len(), "undetermined independence result");
        }
        Ok(result)
    }

    /// Maps a result to an independence verdict under the session's policy.
    pub fn decide(&self, result: &IndependenceResult, x: &Node, y: &Node, z: &[Node]) -> Result<bool, SearchError> {
        match result.outcome {
            Outcome::Independent => Ok(true),
            Outcome::Dependent => Ok(false),
            Outcome::Undetermined => match self.policy {
                UndeterminedPolicy::AssumeDependent => Ok(false),
                UndeterminedPolicy::AssumeIndependent => Ok(true),
                UndeterminedPolicy::Fail => Err(SearchError::Undetermined {
                    x: x.name().to_string(),
                    y: y.name().to_string(),
                    z: z.iter().map(Node::name).collect::<Vec<_>>().join(", "),
                }),
            },
        }
    }

    pub fn is_independent(&mut self, x: &Node, y: &Node, z: &[Node]) -> Result<bool, SearchError> {
        let result = self.check(x, y, z)?;
        self.decide(&result, x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::indtest::DSeparationTest;
    use blanket_core::BlanketErrorCode;

    struct Degenerate(Vec<Node>);

    impl IndependenceTest for Degenerate {
        fn check(&self, _: &Node, _: &Node, _: &[Node]) -> Result<IndependenceResult, blanket_core::errors::IndTestError> {
            Ok(IndependenceResult::undetermined())
        }
        fn variables(&self) -> &[Node] {
            &self.0
        }
        fn alpha(&self) -> f64 {
            0.05
        }
        fn name(&self) -> &str {
            "degenerate"
        }
    }

    fn chain_session(cancel: CancelToken) -> TestSession {
        let g = Graph::from_spec("A-->B,B-->C").unwrap();
        TestSession::new(Arc::new(DSeparationTest::new(g)), UndeterminedPolicy::default(), cancel)
    }

    #[test]
    fn counts_tests_and_resolves_targets() {
        let mut session = chain_session(CancelToken::new());
        session.begin();
        let (a, b, c) = (Node::new("A"), Node::new("B"), Node::new("C"));
        assert!(session.is_independent(&a, &c, &[b.clone()]).unwrap());
        assert!(!session.is_independent(&a, &c, &[]).unwrap());
        assert_eq!(session.num_tests(), 2);
        assert_eq!(session.resolve_target("B").unwrap(), b);
        let err = session.resolve_target("Q").unwrap_err();
        assert_eq!(err.error_code(), "SEARCH_UNKNOWN_TARGET");
    }

    #[test]
    fn cancelled_token_abandons_before_testing() {
        let token = CancelToken::new();
        let mut session = chain_session(token.clone());
        session.begin();
        token.cancel();
        let err = session.check(&Node::new("A"), &Node::new("C"), &[]).unwrap_err();
        assert!(err.is_abandoned());
        assert_eq!(session.num_tests(), 0);
    }

    #[test]
    fn undetermined_policy_is_applied() {
        let vars = vec![Node::new("X"), Node::new("Y")];
        let (x, y) = (vars[0].clone(), vars[1].clone());
        let test: Arc<dyn IndependenceTest> = Arc::new(Degenerate(vars));

        let mut keep = TestSession::new(test.clone(), UndeterminedPolicy::AssumeDependent, CancelToken::new());
        assert!(!keep.is_independent(&x, &y, &[]).unwrap());

        let mut drop = TestSession::new(test.clone(), UndeterminedPolicy::AssumeIndependent, CancelToken::new());
        assert!(drop.is_independent(&x, &y, &[]).unwrap());

        let mut fail = TestSession::new(test, UndeterminedPolicy::Fail, CancelToken::new());
        let err = fail.is_independent(&x, &y, &[]).unwrap_err();
        assert_eq!(err.error_code(), "SEARCH_UNDETERMINED");
    }
}
