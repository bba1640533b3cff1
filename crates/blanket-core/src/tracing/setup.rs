//! Installs the global `tracing` subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to the configured level.
///
/// Returns `false` when a global subscriber was already installed; calling twice is harmless.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.effective_level()));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(config.effective_show_targets());

    let installed = if config.effective_json() {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = config.effective_level(), "tracing initialized");
    }
    installed
}
