//! Unified error type for the MOFH server manager.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for every server manager operation.
///
/// Provider-facing variants always carry the action name and the provider
/// name so the host platform can show a self-explanatory message.
#[derive(Error, Debug)]
pub enum MofhError {
    // ============ Setup Errors ============
    /// Missing or invalid configuration, raised before any request is made.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Remote Call Errors ============
    /// Network failure, timeout, or a non-2xx HTTP status.
    #[error("Failed to {action} on the {provider} server. Transport error: {message}")]
    Transport {
        action: String,
        provider: String,
        status: Option<u16>,
        message: String,
    },

    /// The body is neither a valid structured document nor a recognizable
    /// plain-text error.
    #[error("Failed to {action} on the {provider} server, check the error logs for further details")]
    MalformedResponse {
        action: String,
        provider: String,
        message: String,
    },

    /// The provider reported that the operation itself failed.
    #[error("Failed to {action} on the {provider} server. Error: {message}")]
    Provider {
        action: String,
        provider: String,
        message: String,
    },

    // ============ Capability Errors ============
    /// The provider categorically does not offer this operation.
    #[error("{operation} is not supported by the {provider} API")]
    UnsupportedOperation {
        operation: &'static str,
        provider: String,
    },

    /// The requested hosting plan does not exist on the provider.
    #[error("Package {name} does not exist on {provider} server. Please create it manually in your reseller panel.")]
    PackageNotFound { name: String, provider: String },
}

impl MofhError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Transport { .. } => "TRANSPORT_ERROR",
            Self::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::UnsupportedOperation { .. } => "UNSUPPORTED_OPERATION",
            Self::PackageNotFound { .. } => "PACKAGE_NOT_FOUND",
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an unsupported operation error.
    #[must_use]
    pub fn unsupported(operation: &'static str, provider: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation,
            provider: provider.into(),
        }
    }

    /// Returns the provider's own message for provider-side failures.
    #[must_use]
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Provider { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Returns the HTTP status for transport failures caused by a status code.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Checks if the failure is likely transient.
    ///
    /// Nothing in this workspace retries; the flag is informational for the
    /// host platform.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { status: None, .. } => true,
            Self::Transport {
                status: Some(code), ..
            } => *code >= 500 || *code == 429,
            _ => false,
        }
    }
}
