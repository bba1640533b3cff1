//! Tests for TOML config loading, defaults, and validation.

use std::io::Write;
use std::time::Duration;

use blanket_core::errors::ConfigError;
use blanket_core::types::{Depth, MbAlgorithm, UndeterminedPolicy};
use blanket_core::{BlanketConfig, BlanketErrorCode};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[test]
fn empty_config_uses_defaults() {
    let config = BlanketConfig::from_toml_str("").unwrap();
    assert_eq!(config.search.effective_depth(), Depth::Max(3));
    assert!((config.search.effective_alpha() - 0.05).abs() < 1e-12);
    assert_eq!(config.search.effective_undetermined(), UndeterminedPolicy::AssumeDependent);
    assert_eq!(config.search.effective_time_limit(), Duration::from_secs(300));
    assert_eq!(config.simulation.effective_num_vars(), 100);
    assert_eq!(config.simulation.effective_sample_size(), 1000);
    assert_eq!(config.simulation.effective_min_mb_size(), 8);
    assert_eq!(config.simulation.effective_num_trials(), 30);
    assert_eq!(config.simulation.effective_algorithms().len(), MbAlgorithm::ALL.len());
    assert_eq!(config.logging.effective_level(), "info");
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_all_sections() {
    let source = r#"
        [search]
        depth = -1
        alpha = 0.01
        undetermined = "fail"
        time_limit_ms = 1500

        [simulation]
        discrete = true
        num_vars = 20
        algorithms = ["GS", "mbfs", "HITON-MB-SYM"]

        [logging]
        level = "debug"
        json = true
    "#;
    let config = BlanketConfig::from_toml_str(source).unwrap();
    assert_eq!(config.search.effective_depth(), Depth::Unbounded);
    assert_eq!(config.search.effective_undetermined(), UndeterminedPolicy::Fail);
    assert_eq!(config.search.effective_time_limit(), Duration::from_millis(1500));
    assert!(config.simulation.effective_discrete());
    assert_eq!(
        config.simulation.effective_algorithms(),
        vec![MbAlgorithm::GrowShrink, MbAlgorithm::Mbfs, MbAlgorithm::HitonMbSym]
    );
    assert!(config.logging.effective_json());
}

#[test]
fn unknown_algorithm_is_a_toml_error() {
    let err = BlanketConfig::from_toml_str("[simulation]\nalgorithms = [\"GES\"]").unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "got {err:?}");
    assert_eq!(err.error_code(), "CONFIG_TOML_ERROR");
}

#[test]
fn depth_below_minus_one_is_rejected() {
    assert!(BlanketConfig::from_toml_str("[search]\ndepth = -3").is_err());
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn alpha_out_of_range_is_invalid() {
    let err = BlanketConfig::from_toml_str("[search]\nalpha = 1.5").unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_INVALID");
}

#[test]
fn inverted_category_bounds_are_invalid() {
    let err =
        BlanketConfig::from_toml_str("[simulation]\nmin_categories = 5\nmax_categories = 3").unwrap_err();
    match err {
        ConfigError::Invalid { field, .. } => assert_eq!(field, "simulation.min_categories"),
        other => panic!("expected Invalid, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// File loading
// ---------------------------------------------------------------------------

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[simulation]\nseed = 7\nsample_size = 250").unwrap();
    let config = BlanketConfig::load(file.path()).unwrap();
    assert_eq!(config.simulation.effective_seed(), 7);
    assert_eq!(config.simulation.effective_sample_size(), 250);
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BlanketConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
