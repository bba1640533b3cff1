//! # blanket-core
//!
//! Foundation crate for the blanket Markov blanket discovery engine.
//! Defines errors, config, tracing setup, shared collections, and cooperative cancellation.
//! Every other crate in the workspace depends on this.

pub mod cancel;
pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use cancel::CancelToken;
pub use config::BlanketConfig;
pub use errors::error_code::BlanketErrorCode;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::depth::Depth;
