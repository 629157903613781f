//! Integration tests using mock HTTP server
//!
//! Tests the full flow: YAML config → authenticated client → retried delete → diagnostics

use async_trait::async_trait;
use pingfederate_admin::client::AdminClient;
use pingfederate_admin::config::{ProviderConfig, RawProviderConfig, ENV_ACCESS_TOKEN};
use pingfederate_admin::diagnostics::{PINGFEDERATE_API_ERROR, PINGFEDERATE_VALIDATION_ERROR};
use pingfederate_admin::resource::{delete_resource, ResourceKind};
use pingfederate_admin::retry::{RetryEvent, RetryExecutor, RetryObserver, RetryPolicy, Sleeper};
use serde_json::json;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CAPTCHA_PATH: &str = "/pf-admin-api/v1/captchaProviders/recaptcha";
const OIDC_POLICY_PATH: &str = "/pf-admin-api/v1/oauth/openIdConnect/policies/policy1";

// ============================================================================
// Helpers
// ============================================================================

#[derive(Default)]
struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
struct CountingObserver {
    retries: Mutex<Vec<(u32, Option<u16>)>>,
    exhausted: Mutex<Option<u32>>,
}

impl RetryObserver for CountingObserver {
    fn on_retry(&self, event: &RetryEvent<'_>) {
        self.retries
            .lock()
            .unwrap()
            .push((event.attempt, event.status));
    }

    fn on_exhausted(&self, attempts: u32, _error: &dyn fmt::Display) {
        *self.exhausted.lock().unwrap() = Some(attempts);
    }
}

/// Write a provider config file pointing at the mock server
fn write_config(server: &MockServer) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "https_host: {}\nusername: administrator\npassword: 2FederateM0re\nproduct_version: \"12.1\"\nx_bypass_external_validation_header: true\nretry:\n  max_attempts: 4\n  initial_backoff_ms: 1000\n",
        server.uri()
    )
    .unwrap();
    file
}

/// Resolve the file without consulting the process environment
fn load_config(file: &tempfile::NamedTempFile) -> ProviderConfig {
    let raw = RawProviderConfig::load(file.path()).unwrap();
    ProviderConfig::resolve(raw, |_| None).unwrap()
}

fn executor(
    config: &ProviderConfig,
    sleeper: &Arc<RecordingSleeper>,
    observer: &Arc<CountingObserver>,
) -> RetryExecutor {
    RetryExecutor::new(config.retry.clone())
        .with_sleeper(sleeper.clone())
        .with_observer(observer.clone())
}

// ============================================================================
// Delete Integration Tests
// ============================================================================

#[tokio::test]
async fn test_delete_captcha_provider_after_transient_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(CAPTCHA_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "resultId": "resource_in_use",
            "message": "The captcha provider is still referenced."
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(CAPTCHA_PATH))
        .and(header("X-Xsrf-Header", "PingFederate"))
        .and(header("X-BypassExternalValidation", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let file = write_config(&mock_server);
    let config = load_config(&file);
    let client = AdminClient::new(&config).unwrap();
    let sleeper = Arc::new(RecordingSleeper::default());
    let observer = Arc::new(CountingObserver::default());

    let diags = delete_resource(
        &client,
        &executor(&config, &sleeper, &observer),
        ResourceKind::CaptchaProvider,
        "recaptcha",
    )
    .await;

    assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
    assert_eq!(
        *sleeper.waits.lock().unwrap(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
    assert_eq!(
        *observer.retries.lock().unwrap(),
        vec![(1, Some(403)), (2, Some(403))]
    );
    assert_eq!(*observer.exhausted.lock().unwrap(), None);
}

#[tokio::test]
async fn test_delete_gives_up_after_four_attempts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(OIDC_POLICY_PATH))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "resultId": "validation_error",
            "message": "Validation error(s) occurred.",
            "validationErrors": [
                {"message": "Policy is the default policy", "fieldPath": "id"}
            ]
        })))
        .expect(4)
        .mount(&mock_server)
        .await;

    let file = write_config(&mock_server);
    let config = load_config(&file);
    let client = AdminClient::new(&config).unwrap();
    let sleeper = Arc::new(RecordingSleeper::default());
    let observer = Arc::new(CountingObserver::default());

    let diags = delete_resource(
        &client,
        &executor(&config, &sleeper, &observer),
        ResourceKind::OpenidConnectPolicy,
        "policy1",
    )
    .await;

    assert!(diags.has_error());
    let error = diags.errors().next().unwrap();
    assert_eq!(error.summary, PINGFEDERATE_VALIDATION_ERROR);
    assert_eq!(error.attribute.as_deref(), Some("policy_id"));
    assert!(error.detail.contains("An error occurred while deleting"));

    let waits = sleeper.waits.lock().unwrap().clone();
    assert_eq!(
        waits,
        vec![
            Duration::from_secs(1),
            Duration::from_secs(2),
            Duration::from_secs(4)
        ]
    );
    assert_eq!(waits.iter().sum::<Duration>(), Duration::from_secs(7));
    assert_eq!(*observer.exhausted.lock().unwrap(), Some(4));
}

#[tokio::test]
async fn test_delete_status_outside_allow_list_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(CAPTCHA_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let file = write_config(&mock_server);
    let config = load_config(&file);
    let client = AdminClient::new(&config).unwrap();
    let sleeper = Arc::new(RecordingSleeper::default());
    let observer = Arc::new(CountingObserver::default());

    let diags = delete_resource(
        &client,
        &executor(&config, &sleeper, &observer),
        ResourceKind::CaptchaProvider,
        "recaptcha",
    )
    .await;

    assert_eq!(diags.errors().count(), 1);
    assert_eq!(diags.errors().next().unwrap().summary, PINGFEDERATE_API_ERROR);
    assert!(sleeper.waits.lock().unwrap().is_empty());
    assert!(observer.retries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_missing_object_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(CAPTCHA_PATH))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let file = write_config(&mock_server);
    let config = load_config(&file);
    let client = AdminClient::new(&config).unwrap();
    let executor = RetryExecutor::new(RetryPolicy::default())
        .with_sleeper(Arc::new(RecordingSleeper::default()));

    let diags = delete_resource(&client, &executor, ResourceKind::CaptchaProvider, "recaptcha").await;

    assert!(diags.is_empty());
}

// ============================================================================
// Version Check Integration Tests
// ============================================================================

#[tokio::test]
async fn test_server_version() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/pf-admin-api/v1/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "12.1.4.2"})))
        .mount(&mock_server)
        .await;

    let file = write_config(&mock_server);
    let config = load_config(&file);
    let client = AdminClient::new(&config).unwrap();

    let server = client.version().await.unwrap();
    assert_eq!(server.version, "12.1.4.2");
    assert_eq!(config.product_version.to_string(), "12.1.4");
}

// ============================================================================
// Configuration Integration Tests
// ============================================================================

#[tokio::test]
async fn test_config_file_with_conflicting_env_token() {
    let mock_server = MockServer::start().await;
    let file = write_config(&mock_server);

    let raw = RawProviderConfig::load(file.path()).unwrap();
    let result = ProviderConfig::resolve(raw, |var| {
        (var == ENV_ACCESS_TOKEN).then(|| "exported-token".to_string())
    });

    assert!(result.is_err());
    assert!(load_config(&file).warnings.is_empty());
}
