//! Admin API client

use crate::auth::Authenticator;
use crate::config::ProviderConfig;
use crate::error::{Error, Result, ResultExt};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Certificate, Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

/// Header PingFederate requires on every admin API call
const XSRF_HEADER: &str = "X-Xsrf-Header";
/// Header asking the server to skip connectivity checks on validation
const BYPASS_VALIDATION_HEADER: &str = "X-BypassExternalValidation";

/// Body of `GET /version`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerVersion {
    /// Four-part product version, e.g. `12.1.2.1`
    pub version: String,
}

/// Authenticated client for one PingFederate admin API
pub struct AdminClient {
    client: Client,
    base_url: String,
    authenticator: Authenticator,
}

impl AdminClient {
    /// Build a client from a resolved provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let authenticator = Authenticator::with_client(config.credentials.clone(), client.clone());

        info!(
            base_url = %config.base_url(),
            auth = config.credentials.method_name(),
            "Configured PingFederate client"
        );

        Ok(Self {
            client,
            base_url: config.base_url(),
            authenticator,
        })
    }

    /// Admin API base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send an authenticated request; non-2xx statuses become `Error::Api`
    pub async fn request(&self, method: Method, path: &str) -> Result<Response> {
        let url = self.build_url(path);
        let req = self.client.request(method.clone(), &url);
        let req = self.authenticator.apply(req).await?;

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} {} failed with {}: {}", method, url, status.as_u16(), body);
            return Err(Error::api(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", method, url);
        Ok(response)
    }

    /// Delete the object at `path`
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.request(Method::DELETE, path).await?;
        Ok(())
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).await?;
        let json: T = response.json().await.map_err(Error::Http)?;
        Ok(json)
    }

    /// Version reported by the server
    pub async fn version(&self) -> Result<ServerVersion> {
        self.get_json("/version").await
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .field("authenticator", &self.authenticator)
            .finish_non_exhaustive()
    }
}

/// User agent sent with every request
pub(crate) fn user_agent(config: &ProviderConfig) -> String {
    let mut agent = format!(
        "{}/{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        config.product_version
    );
    if let Some(suffix) = &config.user_agent_suffix {
        agent.push(' ');
        agent.push_str(suffix);
    }
    agent
}

fn build_http_client(config: &ProviderConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(XSRF_HEADER, HeaderValue::from_static("PingFederate"));
    headers.insert(
        BYPASS_VALIDATION_HEADER,
        HeaderValue::from_static(if config.x_bypass_external_validation {
            "true"
        } else {
            "false"
        }),
    );

    let mut builder = Client::builder()
        .default_headers(headers)
        .user_agent(user_agent(config))
        .timeout(config.timeout)
        .danger_accept_invalid_certs(config.insecure_trust_all_tls);

    for pem_file in &config.ca_certificate_pem_files {
        let pem = std::fs::read(pem_file)
            .with_context(|| format!("Failed to read CA PEM certificate file {}", pem_file.display()))?;
        let cert = Certificate::from_pem(&pem).with_context(|| {
            format!("Failed to parse CA PEM certificate from file {}", pem_file.display())
        })?;
        info!("Adding CA cert from file: {}", pem_file.display());
        builder = builder.add_root_certificate(cert);
    }

    Ok(builder.build()?)
}
