//! Request pipeline shared by every operation.

use crate::classifier::{self, ResponseFault};
use crate::request::{Action, Params, ProviderRequest};
use crate::response::{self, DecodedResponse};
use crate::transport::Transport;
use mofh_config::ProviderConfig;
use mofh_core::{MofhError, MofhResult};
use std::sync::Arc;
use tracing::{debug, error};

/// Low-level client for the provider API.
///
/// `call` builds the request, sends it, decodes the body and classifies the
/// result. Every failure is logged once here before it is returned.
pub struct MofhApiClient<T> {
    config: Arc<ProviderConfig>,
    transport: T,
}

impl<T: Transport> MofhApiClient<T> {
    pub fn new(config: Arc<ProviderConfig>, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs `action` and returns the classified-successful response.
    pub async fn call(&self, action: Action, params: Params) -> MofhResult<Box<dyn DecodedResponse>> {
        let request = ProviderRequest::build(&self.config, action, params)?;
        debug!(
            action = %action,
            url = %request.url,
            params = ?request.redacted_params(),
            "Calling MOFH API"
        );

        let raw = self.transport.execute(&request).await.map_err(|failure| {
            error!(action = %action, message = %failure.message, "MOFH API request failed");
            self.transport_error(action, None, failure.message)
        })?;

        if !raw.is_success() {
            error!(
                action = %action,
                status = raw.status,
                body = %raw.body,
                "MOFH API returned an HTTP error"
            );
            return Err(self.transport_error(action, Some(raw.status), format!("HTTP {}: {}", raw.status, raw.body.trim())));
        }

        let decoded = match response::decode(self.config.surface, &raw.body) {
            Ok(decoded) => decoded,
            Err(e) => {
                debug!(action = %action, "Response did not decode: {}", e);
                return Err(self.fault_error(action, classifier::classify_unparsed(&raw.body), &raw.body));
            }
        };

        classifier::classify(action, decoded.as_ref())
            .map_err(|fault| self.fault_error(action, fault, &raw.body))?;

        Ok(decoded)
    }

    /// Provider-reported failure found by operation-specific checks.
    pub fn provider_error(&self, action: Action, message: impl Into<String>) -> MofhError {
        let message = message.into();
        error!(action = %action, message = %message, "MOFH API error");
        MofhError::Provider {
            action: action.name().to_string(),
            provider: self.config.provider_name.clone(),
            message,
        }
    }

    fn fault_error(&self, action: Action, fault: ResponseFault, body: &str) -> MofhError {
        match fault {
            ResponseFault::Provider(message) => self.provider_error(action, message),
            ResponseFault::Malformed(message) => {
                error!(
                    action = %action,
                    diagnostic = %message,
                    body = %body,
                    "MOFH API response is invalid"
                );
                MofhError::MalformedResponse {
                    action: action.name().to_string(),
                    provider: self.config.provider_name.clone(),
                    message,
                }
            }
        }
    }

    fn transport_error(&self, action: Action, status: Option<u16>, message: String) -> MofhError {
        MofhError::Transport {
            action: action.name().to_string(),
            provider: self.config.provider_name.clone(),
            status,
            message,
        }
    }
}
