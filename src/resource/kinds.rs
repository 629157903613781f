//! Resource kind registry

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A kind of configuration object that can be deleted through the admin API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Authentication policy contract
    AuthenticationPolicyContract,
    /// CAPTCHA or risk provider
    CaptchaProvider,
    /// Trusted CA certificate
    CertificateCa,
    /// LDAP, JDBC or custom data store
    DataStore,
    /// IdP adapter instance
    IdpAdapter,
    /// IdP-side SP connection
    IdpSpConnection,
    /// Signing key pair
    KeypairsSigningKey,
    /// SSL server key pair
    KeypairsSslServerKey,
    /// Notification publisher
    NotificationPublisher,
    /// OAuth access token manager
    OauthAccessTokenManager,
    /// OAuth client
    OauthClient,
    /// OpenID Connect policy
    OpenidConnectPolicy,
    /// Password credential validator
    PasswordCredentialValidator,
    /// Secret manager
    SecretManager,
    /// Session authentication policy
    SessionAuthenticationPolicy,
    /// Token processor (SP token translator)
    TokenProcessor,
    /// Token processor to token generator mapping
    TokenProcessorToTokenGeneratorMapping,
}

impl ResourceKind {
    /// Every kind, in name order
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::AuthenticationPolicyContract,
        ResourceKind::CaptchaProvider,
        ResourceKind::CertificateCa,
        ResourceKind::DataStore,
        ResourceKind::IdpAdapter,
        ResourceKind::IdpSpConnection,
        ResourceKind::KeypairsSigningKey,
        ResourceKind::KeypairsSslServerKey,
        ResourceKind::NotificationPublisher,
        ResourceKind::OauthAccessTokenManager,
        ResourceKind::OauthClient,
        ResourceKind::OpenidConnectPolicy,
        ResourceKind::PasswordCredentialValidator,
        ResourceKind::SecretManager,
        ResourceKind::SessionAuthenticationPolicy,
        ResourceKind::TokenProcessor,
        ResourceKind::TokenProcessorToTokenGeneratorMapping,
    ];

    /// Snake-case name, as accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::AuthenticationPolicyContract => "authentication_policy_contract",
            ResourceKind::CaptchaProvider => "captcha_provider",
            ResourceKind::CertificateCa => "certificate_ca",
            ResourceKind::DataStore => "data_store",
            ResourceKind::IdpAdapter => "idp_adapter",
            ResourceKind::IdpSpConnection => "idp_sp_connection",
            ResourceKind::KeypairsSigningKey => "keypairs_signing_key",
            ResourceKind::KeypairsSslServerKey => "keypairs_ssl_server_key",
            ResourceKind::NotificationPublisher => "notification_publisher",
            ResourceKind::OauthAccessTokenManager => "oauth_access_token_manager",
            ResourceKind::OauthClient => "oauth_client",
            ResourceKind::OpenidConnectPolicy => "openid_connect_policy",
            ResourceKind::PasswordCredentialValidator => "password_credential_validator",
            ResourceKind::SecretManager => "secret_manager",
            ResourceKind::SessionAuthenticationPolicy => "session_authentication_policy",
            ResourceKind::TokenProcessor => "token_processor",
            ResourceKind::TokenProcessorToTokenGeneratorMapping => {
                "token_processor_to_token_generator_mapping"
            }
        }
    }

    /// Admin API collection holding objects of this kind
    pub fn collection_path(self) -> &'static str {
        match self {
            ResourceKind::AuthenticationPolicyContract => "/authenticationPolicyContracts",
            ResourceKind::CaptchaProvider => "/captchaProviders",
            ResourceKind::CertificateCa => "/certificates/ca",
            ResourceKind::DataStore => "/dataStores",
            ResourceKind::IdpAdapter => "/idp/adapters",
            ResourceKind::IdpSpConnection => "/idp/spConnections",
            ResourceKind::KeypairsSigningKey => "/keyPairs/signing",
            ResourceKind::KeypairsSslServerKey => "/keyPairs/sslServer",
            ResourceKind::NotificationPublisher => "/notificationPublishers",
            ResourceKind::OauthAccessTokenManager => "/oauth/accessTokenManagers",
            ResourceKind::OauthClient => "/oauth/clients",
            ResourceKind::OpenidConnectPolicy => "/oauth/openIdConnect/policies",
            ResourceKind::PasswordCredentialValidator => "/passwordCredentialValidators",
            ResourceKind::SecretManager => "/secretManagers",
            ResourceKind::SessionAuthenticationPolicy => "/session/authenticationSessionPolicies",
            ResourceKind::TokenProcessor => "/idp/tokenProcessors",
            ResourceKind::TokenProcessorToTokenGeneratorMapping => {
                "/tokenProcessorToTokenGeneratorMappings"
            }
        }
    }

    /// Attribute holding the object's identifier
    pub fn id_attribute(self) -> &'static str {
        match self {
            ResourceKind::AuthenticationPolicyContract => "contract_id",
            ResourceKind::CaptchaProvider => "provider_id",
            ResourceKind::CertificateCa
            | ResourceKind::KeypairsSigningKey
            | ResourceKind::KeypairsSslServerKey => "key_id",
            ResourceKind::DataStore => "data_store_id",
            ResourceKind::IdpAdapter => "adapter_id",
            ResourceKind::IdpSpConnection => "connection_id",
            ResourceKind::NotificationPublisher => "publisher_id",
            ResourceKind::OauthAccessTokenManager => "manager_id",
            ResourceKind::OauthClient => "client_id",
            ResourceKind::OpenidConnectPolicy => "policy_id",
            ResourceKind::PasswordCredentialValidator => "validator_id",
            ResourceKind::SecretManager => "manager_id",
            ResourceKind::SessionAuthenticationPolicy => "policy_id",
            ResourceKind::TokenProcessor => "processor_id",
            ResourceKind::TokenProcessorToTokenGeneratorMapping => "mapping_id",
        }
    }

    /// Delete statuses treated as transient for this kind
    pub fn retryable_delete_statuses(self) -> &'static [u16] {
        match self {
            ResourceKind::CaptchaProvider => &[403],
            ResourceKind::OpenidConnectPolicy => &[422],
            _ => &[],
        }
    }

    /// Path of one object
    pub fn object_path(self, id: &str) -> Result<String> {
        if id.is_empty() {
            return Err(Error::invalid_value(self.id_attribute(), "must not be empty"));
        }
        if id.contains(['/', '?', '#']) {
            return Err(Error::invalid_value(
                self.id_attribute(),
                format!("'{id}' must not contain '/', '?' or '#'"),
            ));
        }
        Ok(format!("{}/{}", self.collection_path(), id))
    }

    /// Human-readable label, e.g. "captcha provider"
    pub fn label(self) -> String {
        self.name().replace('_', " ")
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().trim_start_matches("pingfederate_").replace('-', "_");
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| Error::UnknownResourceKind(s.to_string()))
    }
}
