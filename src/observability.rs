//! Observability for the gateway
//!
//! Installs the global `tracing` subscriber. Output is either human-readable
//! text or one JSON object per event. `RUST_LOG`, when set, overrides the
//! configured level.

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

/// Build the filter from `RUST_LOG`, falling back to `config.level`
pub fn env_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init(config: &LogConfig) -> Result<(), String> {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter(config));

    let result = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    result.map_err(|e| e.to_string())
}
