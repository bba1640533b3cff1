//! Markov blanket searches.
//!
//! Every strategy implements [`MbSearch`] and routes its independence tests through a
//! [`TestSession`], so cancellation, counting, and undetermined handling behave the same
//! everywhere. Strategies are selected with [`MbAlgorithm`] via [`build`].

/// `MbSearch` for a type with a `session: TestSession` field and a
/// `run(&mut self, &Node) -> Result<Vec<Node>, SearchError>` method. Without a literal
/// name the type supplies `fn label(&self) -> &'static str`.
macro_rules! impl_mb_search {
    ($ty:ty, $name:literal) => {
        impl_mb_search!(@impl $ty, |_this: &$ty| $name);
    };
    ($ty:ty) => {
        impl_mb_search!(@impl $ty, |this: &$ty| this.label());
    };
    (@impl $ty:ty, $name:expr) => {
        impl $crate::mb::MbSearch for $ty {
            fn find_mb(&mut self, target: &str) -> Result<Vec<$crate::graph::Node>, ::blanket_core::errors::SearchError> {
                let target = self.session.resolve_target(target)?;
                self.session.begin();
                let result = self.run(&target);
                let elapsed = self.session.finish();
                let blanket = result?;
                ::tracing::info!(
                    algorithm = $crate::mb::MbSearch::algorithm_name(self),
                    target_node = %target,
                    size = blanket.len(),
                    tests = self.session.num_tests(),
                    ?elapsed,
                    "search finished"
                );
                Ok(blanket)
            }

            fn algorithm_name(&self) -> &'static str {
                let name = $name;
                name(self)
            }

            fn num_independence_tests(&self) -> usize {
                self.session.num_tests()
            }

            fn elapsed(&self) -> ::std::time::Duration {
                self.session.elapsed()
            }

            fn set_cancel_token(&mut self, token: ::blanket_core::CancelToken) {
                self.session.set_cancel_token(token);
            }
        }
    };
}

pub mod grow_shrink;
pub mod hiton;
pub mod iamb;
pub mod iamb_pc;
pub mod mbfs;
pub mod mmmb;
pub mod orientation;
pub mod pcmb;
mod phases;
pub mod sepset;
pub mod session;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use blanket_core::config::SearchConfig;
use blanket_core::errors::SearchError;
use blanket_core::types::{MbAlgorithm, UndeterminedPolicy};
use blanket_core::{CancelToken, Depth};

use crate::graph::Node;
use crate::indtest::IndependenceTest;

pub use grow_shrink::GrowShrink;
pub use hiton::HitonMb;
pub use iamb::{Iamb, InterIamb};
pub use iamb_pc::{IambnPc, InterIambnPc};
pub use mbfs::Mbfs;
pub use mmmb::Mmmb;
pub use pcmb::Pcmb;
pub use sepset::SepsetMap;
pub use session::TestSession;

/// Common contract of the Markov blanket searches.
pub trait MbSearch {
    /// Markov blanket of the named target, target excluded, no duplicates.
    fn find_mb(&mut self, target: &str) -> Result<Vec<Node>, SearchError>;

    fn algorithm_name(&self) -> &'static str;

    /// Tests run by the most recent search.
    fn num_independence_tests(&self) -> usize;

    /// Wall time of the most recent search.
    fn elapsed(&self) -> Duration;

    fn set_cancel_token(&mut self, token: CancelToken);
}

/// Settings shared by every strategy.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub depth: Depth,
    pub policy: UndeterminedPolicy,
    pub cancel: CancelToken,
}

impl SearchOptions {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            depth: config.effective_depth(),
            policy: config.effective_undetermined(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_depth(mut self, depth: Depth) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_policy(mut self, policy: UndeterminedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub(crate) fn session(&self, test: Arc<dyn IndependenceTest>) -> TestSession {
        TestSession::new(test, self.policy, self.cancel.clone())
    }
}

/// Instantiates the strategy named by `algorithm`.
pub fn build(algorithm: MbAlgorithm, test: Arc<dyn IndependenceTest>, options: SearchOptions) -> Box<dyn MbSearch + Send> {
    match algorithm {
        MbAlgorithm::GrowShrink => Box::new(GrowShrink::new(test, options)),
        MbAlgorithm::Iamb => Box::new(Iamb::new(test, options)),
        MbAlgorithm::InterIamb => Box::new(InterIamb::new(test, options)),
        MbAlgorithm::IambnPc => Box::new(IambnPc::new(test, options)),
        MbAlgorithm::InterIambnPc => Box::new(InterIambnPc::new(test, options)),
        MbAlgorithm::HitonMb => Box::new(HitonMb::new(test, options)),
        MbAlgorithm::HitonMbSym => Box::new(HitonMb::symmetric(test, options)),
        MbAlgorithm::Mmmb => Box::new(Mmmb::new(test, options)),
        MbAlgorithm::MmmbSym => Box::new(Mmmb::symmetric(test, options)),
        MbAlgorithm::Pcmb => Box::new(Pcmb::new(test, options)),
        MbAlgorithm::Mbfs => Box::new(Mbfs::new(test, options)),
    }
}
