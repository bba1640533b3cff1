//! Stable, machine-readable error codes.

/// Maps an error value to a stable code string for logs and reports.
pub trait BlanketErrorCode {
    fn error_code(&self) -> &'static str;
}

pub const NODE_NOT_IN_GRAPH: &str = "GRAPH_NODE_NOT_IN_GRAPH";
pub const EDGE_NOT_IN_GRAPH: &str = "GRAPH_EDGE_NOT_IN_GRAPH";
pub const INVALID_TRIPLE: &str = "GRAPH_INVALID_TRIPLE";
pub const GRAPH_PARSE: &str = "GRAPH_PARSE_ERROR";
pub const GRAPH_CYCLE: &str = "GRAPH_CYCLE";

pub const UNKNOWN_VARIABLE: &str = "INDTEST_UNKNOWN_VARIABLE";
pub const DIMENSION_MISMATCH: &str = "INDTEST_DIMENSION_MISMATCH";
pub const INVALID_ALPHA: &str = "INDTEST_INVALID_ALPHA";
pub const INSUFFICIENT_DATA: &str = "INDTEST_INSUFFICIENT_DATA";

pub const UNKNOWN_TARGET: &str = "SEARCH_UNKNOWN_TARGET";
pub const SEARCH_ABANDONED: &str = "SEARCH_ABANDONED";
pub const SEARCH_UNDETERMINED: &str = "SEARCH_UNDETERMINED";

pub const UNSPECIFIED_TABLE: &str = "SIMULATION_UNSPECIFIED_TABLE";
pub const INVALID_SIMULATION_PARAMETER: &str = "SIMULATION_INVALID_PARAMETER";

pub const NO_ELIGIBLE_TARGET: &str = "HARNESS_NO_ELIGIBLE_TARGET";
pub const WORKER_LOST: &str = "HARNESS_WORKER_LOST";
pub const WORKER_SPAWN: &str = "HARNESS_WORKER_SPAWN";

pub const CONFIG_IO: &str = "CONFIG_IO_ERROR";
pub const CONFIG_TOML: &str = "CONFIG_TOML_ERROR";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
