//! Error types for every subsystem, each with a stable error code.

pub mod config_error;
pub mod error_code;
pub mod graph_error;
pub mod harness_error;
pub mod indtest_error;
pub mod search_error;
pub mod simulation_error;

pub use config_error::ConfigError;
pub use error_code::BlanketErrorCode;
pub use graph_error::GraphError;
pub use harness_error::HarnessError;
pub use indtest_error::IndTestError;
pub use search_error::SearchError;
pub use simulation_error::SimulationError;
