//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::AdminClient;
use crate::config::{process_env, ProviderConfig, RawProviderConfig};
use crate::diagnostics::{Diagnostics, Severity};
use crate::error::{Error, Result};
use crate::resource::{delete_resource_with_statuses, ResourceKind};
use crate::retry::{RetryExecutor, RetryPolicy};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
    env: fn(&str) -> Option<String>,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env: process_env,
        }
    }

    /// Replace the environment lookup used as config fallback
    #[must_use]
    pub(crate) fn with_env(mut self, env: fn(&str) -> Option<String>) -> Self {
        self.env = env;
        self
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Delete {
                kind,
                id,
                retry_status,
                max_attempts,
            } => self.delete(kind, id, retry_status, *max_attempts).await,
            Commands::Check => self.check().await,
            Commands::Kinds => {
                self.kinds();
                Ok(())
            }
        }
    }

    /// Load provider configuration
    fn load_config(&self) -> Result<ProviderConfig> {
        let raw = match &self.cli.config {
            Some(path) => RawProviderConfig::load(path)?,
            None => RawProviderConfig::default(),
        };
        let config = ProviderConfig::resolve(raw, self.env)?;
        for warning in &config.warnings {
            self.output_message(&json!({"type": "WARNING", "message": warning}));
        }
        Ok(config)
    }

    async fn delete(
        &self,
        kind: &str,
        id: &str,
        extra_statuses: &[u16],
        max_attempts: Option<u32>,
    ) -> Result<()> {
        let kind: ResourceKind = kind.parse()?;
        let config = self.load_config()?;
        let client = AdminClient::new(&config)?;

        let policy = delete_policy(&config.retry, max_attempts);

        // Ctrl-C stops a pending backoff wait
        let cancel = CancellationToken::new();
        let on_signal = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, abandoning retries");
                on_signal.cancel();
            }
        });
        let executor = RetryExecutor::new(policy).with_cancellation(cancel);

        let retryable = retryable_statuses(kind, extra_statuses);

        let diagnostics =
            delete_resource_with_statuses(&client, &executor, kind, id, &retryable).await;
        self.output_diagnostics(&diagnostics);

        if diagnostics.has_error() {
            return Err(Error::Other(format!("Failed to delete {} '{}'", kind.label(), id)));
        }

        self.output_message(&json!({
            "type": "DELETED",
            "kind": kind.name(),
            "id": id,
        }));
        Ok(())
    }

    async fn check(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = AdminClient::new(&config)?;
        let server = client.version().await?;

        let matches = server_matches_config(&server.version, &config);

        if !matches {
            self.output_message(&json!({
                "type": "WARNING",
                "message": format!(
                    "Server reports PingFederate {} but product_version is {}",
                    server.version, config.product_version
                ),
            }));
        }

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "status": "SUCCEEDED",
            "base_url": client.base_url(),
            "server_version": server.version,
            "version_matches": matches,
            "product_version": config.product_version.to_string(),
        }));
        Ok(())
    }

    fn kinds(&self) {
        for kind in ResourceKind::ALL {
            self.output_message(&json!({
                "kind": kind.name(),
                "path": kind.collection_path(),
                "id_attribute": kind.id_attribute(),
                "retryable_delete_statuses": kind.retryable_delete_statuses(),
            }));
        }
    }

    fn output_diagnostics(&self, diagnostics: &Diagnostics) {
        for diagnostic in diagnostics {
            let level = match diagnostic.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARNING",
            };
            self.output_message(&json!({
                "type": level,
                "summary": diagnostic.summary,
                "detail": diagnostic.detail,
                "attribute": diagnostic.attribute,
            }));
        }
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Kind statuses plus any extra codes, without duplicates
fn retryable_statuses(kind: ResourceKind, extra: &[u16]) -> Vec<u16> {
    let mut statuses = kind.retryable_delete_statuses().to_vec();
    for status in extra {
        if !statuses.contains(status) {
            statuses.push(*status);
        }
    }
    statuses
}

/// Configured policy with the command-line attempt override applied
fn delete_policy(base: &RetryPolicy, max_attempts: Option<u32>) -> RetryPolicy {
    match max_attempts {
        Some(attempts) => base.clone().max_attempts(attempts),
        None => base.clone(),
    }
}

fn server_matches_config(server_version: &str, config: &ProviderConfig) -> bool {
    config
        .product_version
        .matches_server(server_version, config.product_version_patch_pinned)
}
