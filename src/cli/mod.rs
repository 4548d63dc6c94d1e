//! CLI module for recordgate
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP gateway
//! - check-config: Validate configuration and print the effective settings

mod args;
mod commands;
mod errors;

pub use args::{BackendArg, Cli, Command, DEFAULT_CONFIG_PATH};
pub use commands::{
    apply_overrides, build_stores, check_config, load_config, run, run_command, serve,
};
pub use errors::{CliError, CliErrorCode, CliResult};
