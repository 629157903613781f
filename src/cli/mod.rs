//! CLI module
//!
//! Command-line interface for the admin API helpers.
//!
//! # Commands
//!
//! - `delete` - Delete a configuration object, retrying transient statuses
//! - `check` - Compare the server version with the configured product version
//! - `kinds` - List deletable resource kinds

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
