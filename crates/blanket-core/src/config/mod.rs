//! Configuration for searches, simulations, and logging.

pub mod blanket_config;
pub mod logging_config;
pub mod search_config;
pub mod simulation_config;

pub use blanket_config::BlanketConfig;
pub use logging_config::LoggingConfig;
pub use search_config::SearchConfig;
pub use simulation_config::SimulationConfig;
