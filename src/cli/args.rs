//! CLI argument definitions using clap
//!
//! Commands:
//! - recordgate serve [--config <path>] [--port <port>] [--backend <external|memory>]
//! - recordgate check-config [--config <path>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::Backend;

/// Path used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./recordgate.json";

/// recordgate - JSON gateway over a document store and a key-value store
#[derive(Parser, Debug)]
#[command(name = "recordgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP gateway
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Store backend (overrides the config file)
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
    },

    /// Validate the configuration and print the effective settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    External,
    Memory,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::External => Backend::External,
            BackendArg::Memory => Backend::Memory,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
