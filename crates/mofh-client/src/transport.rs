//! HTTP transport for provider requests.

use crate::request::{HttpMethod, ProviderRequest, REDACTED_KEYS};
use async_trait::async_trait;
use mofh_config::ProviderConfig;
use mofh_core::{MofhError, MofhResult};
use reqwest::Client;
use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Exchange that produced no response: connection, TLS or timeout failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub message: String,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sends a built request and returns whatever the server answered.
///
/// Implementations do not interpret status codes or bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &ProviderRequest) -> Result<RawResponse, TransportFailure>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: &ProviderRequest) -> Result<RawResponse, TransportFailure> {
        (**self).execute(request).await
    }
}

/// reqwest-backed transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport honoring the configured timeout and TLS policy.
    pub fn new(config: &ProviderConfig) -> MofhResult<Self> {
        let timeout = config.timeout();
        let client = Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .user_agent(concat!("mofh-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MofhError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    /// Failure text without the request URL, which carries the query string.
    fn describe(&self, err: reqwest::Error, request: &ProviderRequest) -> String {
        if err.is_timeout() {
            return format!("request timed out after {} seconds", self.timeout.as_secs());
        }

        let prefix = if err.is_connect() { "connection failed: " } else { "" };
        let err = err.without_url();
        let mut message = format!("{}{}", prefix, err);
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        scrub_secrets(message, request)
    }
}

/// Masks secret parameter values that might still appear in `message`.
fn scrub_secrets(mut message: String, request: &ProviderRequest) -> String {
    let secrets = request
        .params
        .iter()
        .filter(|(key, _)| REDACTED_KEYS.contains(key))
        .map(|(_, value)| value.as_str())
        .chain(request.basic_auth.as_ref().map(|auth| auth.password.as_str()));
    for secret in secrets {
        if !secret.is_empty() {
            message = message.replace(secret, "<redacted>");
        }
    }
    message
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &ProviderRequest) -> Result<RawResponse, TransportFailure> {
        debug!("{:?} {}", request.method, request.url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.target_url()),
            HttpMethod::Post => self.client.post(request.url.clone()).form(&request.params),
        };
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportFailure::new(self.describe(e, request)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| {
                TransportFailure::new(format!("failed to read response body: {}", self.describe(e, request)))
            })?;

        debug!("{} answered {} with {} bytes", request.action, status, body.len());
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Action;
    use mofh_config::AuthMode;

    #[test]
    fn test_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(500, "").is_success());
    }

    #[test]
    fn test_client_builds_without_tls_verification() {
        let mut config = ProviderConfig::new("panel.example.net", "reseller", "key", "cpanel.example.com");
        config.verify_tls = false;
        assert!(HttpTransport::new(&config).is_ok());
    }

    #[test]
    fn test_scrub_secrets_masks_key_and_password() {
        let mut config = ProviderConfig::new("panel.example.net", "reseller", "SUPERSECRETKEY", "cpanel.example.com");
        config.auth_mode = AuthMode::Parameters;
        let request = ProviderRequest::build(
            &config,
            Action::ChangePassword,
            vec![("user", "example1".to_string()), ("pass", "hunter22".to_string())],
        )
        .unwrap();

        let message = scrub_secrets(
            "sending to https://panel.example.net/?api_key=SUPERSECRETKEY&pass=hunter22 failed".to_string(),
            &request,
        );

        assert!(!message.contains("SUPERSECRETKEY"));
        assert!(!message.contains("hunter22"));
        assert!(message.ends_with("pass=<redacted> failed"));
    }

    #[test]
    fn test_scrub_secrets_masks_basic_auth_password() {
        let config = ProviderConfig::new("panel.example.net", "reseller", "SUPERSECRETKEY", "cpanel.example.com");
        let request = ProviderRequest::build(&config, Action::Version, Vec::new()).unwrap();

        let message = scrub_secrets("rejected key SUPERSECRETKEY".to_string(), &request);

        assert_eq!(message, "rejected key <redacted>");
    }
}
