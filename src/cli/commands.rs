//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// PingFederate admin API helper
#[derive(Parser, Debug)]
#[command(name = "pingfederate-admin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Provider configuration file (YAML); PINGFEDERATE_PROVIDER_* env vars fill the gaps
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete a configuration object
    Delete {
        /// Resource kind (see `kinds`)
        kind: String,

        /// Identifier of the object
        id: String,

        /// Additional status to retry on (repeatable)
        #[arg(long = "retry-status", value_name = "CODE")]
        retry_status: Vec<u16>,

        /// Override the maximum number of attempts
        #[arg(long)]
        max_attempts: Option<u32>,
    },

    /// Check connectivity and the server version
    Check,

    /// List deletable resource kinds
    Kinds,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
