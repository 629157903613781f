//! Provider configuration
//!
//! Settings come from an optional YAML file and fall back to the
//! `PINGFEDERATE_PROVIDER_*` environment variables. A value present in the
//! file always wins over the environment.

use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use crate::version::SupportedVersion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

// ============================================================================
// Environment variables
// ============================================================================

/// Admin listener URL
pub const ENV_HTTPS_HOST: &str = "PINGFEDERATE_PROVIDER_HTTPS_HOST";
/// Admin API base path
pub const ENV_ADMIN_API_PATH: &str = "PINGFEDERATE_PROVIDER_ADMIN_API_PATH";
/// Basic auth username
pub const ENV_USERNAME: &str = "PINGFEDERATE_PROVIDER_USERNAME";
/// Basic auth password
pub const ENV_PASSWORD: &str = "PINGFEDERATE_PROVIDER_PASSWORD";
/// Static bearer token
pub const ENV_ACCESS_TOKEN: &str = "PINGFEDERATE_PROVIDER_ACCESS_TOKEN";
/// OAuth2 client ID
pub const ENV_OAUTH_CLIENT_ID: &str = "PINGFEDERATE_PROVIDER_OAUTH_CLIENT_ID";
/// OAuth2 client secret
pub const ENV_OAUTH_CLIENT_SECRET: &str = "PINGFEDERATE_PROVIDER_OAUTH_CLIENT_SECRET";
/// Comma-separated OAuth2 scopes
pub const ENV_OAUTH_SCOPES: &str = "PINGFEDERATE_PROVIDER_OAUTH_SCOPES";
/// OAuth2 token endpoint
pub const ENV_OAUTH_TOKEN_URL: &str = "PINGFEDERATE_PROVIDER_OAUTH_TOKEN_URL";
/// PingFederate product version
pub const ENV_PRODUCT_VERSION: &str = "PINGFEDERATE_PROVIDER_PRODUCT_VERSION";
/// Disable certificate verification
pub const ENV_INSECURE_TRUST_ALL_TLS: &str = "PINGFEDERATE_PROVIDER_INSECURE_TRUST_ALL_TLS";
/// Comma-separated CA PEM file paths
pub const ENV_CA_CERTIFICATE_PEM_FILES: &str = "PINGFEDERATE_PROVIDER_CA_CERTIFICATE_PEM_FILES";
/// Send `X-BypassExternalValidation: true`
pub const ENV_X_BYPASS_EXTERNAL_VALIDATION_HEADER: &str =
    "PINGFEDERATE_PROVIDER_X_BYPASS_EXTERNAL_VALIDATION_HEADER";
/// Suffix appended to the user agent
pub const ENV_APPEND_USER_AGENT: &str = "PINGFEDERATE_TF_APPEND_USER_AGENT";

/// Admin API path used when none is configured
pub const DEFAULT_ADMIN_API_PATH: &str = "/pf-admin-api/v1";

fn default_timeout_secs() -> u64 {
    30
}

// ============================================================================
// Raw (file) configuration
// ============================================================================

/// Provider settings as written in a config file; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProviderConfig {
    /// Admin listener URL, e.g. `https://localhost:9999`
    pub https_host: Option<String>,
    /// Admin API base path
    pub admin_api_path: Option<String>,
    /// Basic auth username
    pub username: Option<String>,
    /// Basic auth password
    pub password: Option<String>,
    /// Static bearer token
    pub access_token: Option<String>,
    /// OAuth2 client ID
    pub client_id: Option<String>,
    /// OAuth2 client secret
    pub client_secret: Option<String>,
    /// OAuth2 scopes
    pub scopes: Option<Vec<String>>,
    /// OAuth2 token endpoint
    pub token_url: Option<String>,
    /// `major.minor` or `major.minor.patch`
    pub product_version: Option<String>,
    /// Disable certificate verification
    pub insecure_trust_all_tls: Option<bool>,
    /// Extra root CAs
    pub ca_certificate_pem_files: Option<Vec<PathBuf>>,
    /// Send `X-BypassExternalValidation: true`
    pub x_bypass_external_validation_header: Option<bool>,
    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Delete retry overrides
    pub retry: RetryConfig,
}

/// Retry overrides from the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// First backoff in milliseconds; doubles after each wait
    pub initial_backoff_ms: u64,
    /// Retry when no response was received
    pub retry_on_no_response: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            initial_backoff_ms: policy.initial_backoff.as_millis() as u64,
            retry_on_no_response: policy.retry_on_no_response,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        RetryPolicy::new()
            .max_attempts(config.max_attempts)
            .initial_backoff(Duration::from_millis(config.initial_backoff_ms))
            .retry_on_no_response(config.retry_on_no_response)
    }
}

impl RawProviderConfig {
    /// Load raw settings from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse raw settings from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

// ============================================================================
// Resolved configuration
// ============================================================================

/// Fully resolved provider configuration
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// `https://host:port` of the PingFederate admin listener
    pub https_host: String,
    /// Admin API base path
    pub admin_api_path: String,
    /// Credentials applied to every request
    pub credentials: Credentials,
    /// Resolved product version
    pub product_version: SupportedVersion,
    /// False when only `major.minor` (or an unknown patch) was configured
    pub product_version_patch_pinned: bool,
    /// Skip server certificate verification
    pub insecure_trust_all_tls: bool,
    /// Extra root CAs
    pub ca_certificate_pem_files: Vec<PathBuf>,
    /// Value of the `X-BypassExternalValidation` header
    pub x_bypass_external_validation: bool,
    /// Extra text appended to the user agent
    pub user_agent_suffix: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Delete retry policy
    pub retry: RetryPolicy,
    /// Non-fatal problems found while resolving
    pub warnings: Vec<String>,
}

impl ProviderConfig {
    /// Resolve from the process environment only
    pub fn from_env() -> Result<Self> {
        Self::resolve(RawProviderConfig::default(), process_env)
    }

    /// Resolve a config file with the process environment as fallback
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::resolve(RawProviderConfig::load(path)?, process_env)
    }

    /// Admin API base URL
    pub fn base_url(&self) -> String {
        format!("{}{}", self.https_host, self.admin_api_path)
    }

    /// Resolve raw settings, consulting `env` for anything absent
    pub fn resolve<F>(raw: RawProviderConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |value: Option<String>, var: &str| -> Option<String> {
            value
                .or_else(|| env(var))
                .filter(|v| !v.trim().is_empty())
        };

        let https_host = lookup(raw.https_host, ENV_HTTPS_HOST)
            .ok_or_else(|| Error::missing_field("https_host", ENV_HTTPS_HOST))?;
        let https_host = normalize_host(&https_host)?;

        let admin_api_path = lookup(raw.admin_api_path, ENV_ADMIN_API_PATH)
            .unwrap_or_else(|| DEFAULT_ADMIN_API_PATH.to_string());
        let admin_api_path = format!("/{}", admin_api_path.trim_matches('/'));

        let scopes = raw.scopes.or_else(|| env(ENV_OAUTH_SCOPES).map(|s| split_list(&s)));
        let credentials = resolve_credentials(CredentialInputs {
            username: lookup(raw.username, ENV_USERNAME),
            password: lookup(raw.password, ENV_PASSWORD),
            access_token: lookup(raw.access_token, ENV_ACCESS_TOKEN),
            client_id: lookup(raw.client_id, ENV_OAUTH_CLIENT_ID),
            client_secret: lookup(raw.client_secret, ENV_OAUTH_CLIENT_SECRET),
            token_url: lookup(raw.token_url, ENV_OAUTH_TOKEN_URL),
            scopes: scopes.unwrap_or_default(),
        })?;

        let mut warnings = Vec::new();

        let product_version = lookup(raw.product_version, ENV_PRODUCT_VERSION)
            .ok_or_else(|| Error::missing_field("product_version", ENV_PRODUCT_VERSION))?;
        let parsed = SupportedVersion::parse(&product_version)?;
        if let Some(warning) = parsed.warning {
            warn!("{}", warning);
            warnings.push(warning);
        }

        let insecure_trust_all_tls = raw.insecure_trust_all_tls.unwrap_or_else(|| {
            env_bool(&env, ENV_INSECURE_TRUST_ALL_TLS, "insecure_trust_all_tls")
        });
        if insecure_trust_all_tls {
            warn!("insecure_trust_all_tls is enabled; server certificates will not be verified");
        }

        let ca_certificate_pem_files = raw.ca_certificate_pem_files.unwrap_or_else(|| {
            env(ENV_CA_CERTIFICATE_PEM_FILES)
                .map(|s| split_list(&s).into_iter().map(PathBuf::from).collect())
                .unwrap_or_default()
        });
        if ca_certificate_pem_files.is_empty() {
            info!("No CA certs specified, using the host's root CA set");
        }

        let x_bypass_external_validation =
            raw.x_bypass_external_validation_header.unwrap_or_else(|| {
                env_bool(
                    &env,
                    ENV_X_BYPASS_EXTERNAL_VALIDATION_HEADER,
                    "x_bypass_external_validation_header",
                )
            });

        Ok(Self {
            https_host,
            admin_api_path,
            credentials,
            product_version: parsed.version,
            product_version_patch_pinned: parsed.patch_pinned,
            insecure_trust_all_tls,
            ca_certificate_pem_files,
            x_bypass_external_validation,
            user_agent_suffix: env(ENV_APPEND_USER_AGENT).filter(|s| !s.trim().is_empty()),
            timeout: Duration::from_secs(raw.timeout_secs.unwrap_or_else(default_timeout_secs)),
            retry: RetryPolicy::from(&raw.retry),
            warnings,
        })
    }
}

pub(crate) fn process_env(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

fn normalize_host(host: &str) -> Result<String> {
    let url = Url::parse(host.trim())?;
    if url.host_str().is_none() {
        return Err(Error::invalid_value("https_host", format!("'{host}' has no host")));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unset or unparseable values count as false
fn env_bool<F>(env: &F, var: &str, field: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = env(var) else {
        return false;
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => true,
        "false" | "f" | "0" => false,
        _ => {
            info!(
                "Failed to parse boolean from '{}' environment variable, defaulting '{}' to false",
                var, field
            );
            false
        }
    }
}

// ============================================================================
// Credential resolution
// ============================================================================

struct CredentialInputs {
    username: Option<String>,
    password: Option<String>,
    access_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    token_url: Option<String>,
    scopes: Vec<String>,
}

fn resolve_credentials(input: CredentialInputs) -> Result<Credentials> {
    let has_basic = input.username.is_some() || input.password.is_some();
    let has_token = input.access_token.is_some();
    let has_oauth = input.client_id.is_some()
        || input.client_secret.is_some()
        || input.token_url.is_some()
        || !input.scopes.is_empty();

    if !has_basic && !has_token && !has_oauth {
        return Err(Error::config(
            "username and password, access_token, or oauth configuration required values were not supplied. \
             Either set them in the configuration or use the PINGFEDERATE_PROVIDER_* environment variables.",
        ));
    }
    if has_basic && has_token {
        return Err(Error::config(
            "Username and password cannot be used with access_token. \
             Only basic authentication (username and password) or access_token can be used.",
        ));
    }
    if has_basic && has_oauth {
        return Err(Error::config(
            "Username and password cannot be used with OAuth configuration properties. \
             Only basic authentication (username and password) or OAuth authentication can be used.",
        ));
    }
    if has_token && has_oauth {
        return Err(Error::config(
            "Access token cannot be used with OAuth configuration properties. \
             Only access_token or OAuth authentication can be used.",
        ));
    }

    if has_basic {
        let username = input
            .username
            .ok_or_else(|| Error::missing_field("username", ENV_USERNAME))?;
        let password = input
            .password
            .ok_or_else(|| Error::missing_field("password", ENV_PASSWORD))?;
        return Ok(Credentials::Basic { username, password });
    }

    if let Some(token) = input.access_token {
        return Ok(Credentials::AccessToken { token });
    }

    let client_id = input
        .client_id
        .ok_or_else(|| Error::missing_field("client_id", ENV_OAUTH_CLIENT_ID))?;
    let client_secret = input
        .client_secret
        .ok_or_else(|| Error::missing_field("client_secret", ENV_OAUTH_CLIENT_SECRET))?;
    let token_url = input
        .token_url
        .ok_or_else(|| Error::missing_field("token_url", ENV_OAUTH_TOKEN_URL))?;
    Url::parse(&token_url)?;

    Ok(Credentials::OAuth2ClientCredentials {
        token_url,
        client_id,
        client_secret,
        scopes: input.scopes,
    })
}
