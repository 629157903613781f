//! # PingFederate Admin
//!
//! Plumbing for the PingFederate administrative API, centered on deleting
//! configuration objects that the server sometimes refuses transiently.
//!
//! ## Features
//!
//! - **Retrying Deletes**: Bounded exponential backoff (1s, 2s, 4s) on a per-call status allow-list
//! - **Provider Configuration**: YAML file or `PINGFEDERATE_PROVIDER_*` environment variables
//! - **Multiple Auth Types**: Basic, static access token, OAuth2 client credentials
//! - **Version Resolution**: Supported product versions with latest-patch fallback
//! - **Diagnostics**: PingFederate error bodies mapped to attribute-level errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pingfederate_admin::{
//!     client::AdminClient, config::ProviderConfig, resource::{delete_resource, ResourceKind},
//!     retry::RetryExecutor,
//! };
//!
//! #[tokio::main]
//! async fn main() -> pingfederate_admin::Result<()> {
//!     let config = ProviderConfig::from_env()?;
//!     let client = AdminClient::new(&config)?;
//!     let executor = RetryExecutor::new(config.retry.clone());
//!
//!     let diags = delete_resource(&client, &executor, ResourceKind::CaptchaProvider, "recaptcha").await;
//!     for d in &diags {
//!         eprintln!("{d}");
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow common clippy pedantic lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

/// Authentication (Basic, access token, OAuth2 client credentials)
pub mod auth;

/// Command-line interface
pub mod cli;

/// Admin API HTTP client
pub mod client;

/// Provider configuration
pub mod config;

/// User-facing diagnostics
pub mod diagnostics;

/// Error types
pub mod error;

/// Deletable resource kinds and the delete operation
pub mod resource;

/// Retry executor for transient delete failures
pub mod retry;

/// Supported PingFederate versions
pub mod version;

// Re-export commonly used types
pub use error::{Error, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
