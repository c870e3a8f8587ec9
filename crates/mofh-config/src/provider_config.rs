//! Server manager configuration structures.

use mofh_core::telemetry::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MofhConfig {
    /// Provider connection settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which of the provider's two API surfaces to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiSurface {
    /// `json-api/` endpoints returning JSON.
    #[default]
    Json,
    /// `xml-api/` endpoints returning XML.
    Xml,
}

impl ApiSurface {
    /// URL path prefix of the surface.
    #[must_use]
    pub const fn path_prefix(&self) -> &'static str {
        match self {
            Self::Json => "json-api",
            Self::Xml => "xml-api",
        }
    }
}

/// How credentials are attached to each request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// HTTP Basic `Authorization` header.
    #[default]
    Basic,
    /// `api_user` / `api_key` merged into the request parameters.
    Parameters,
}

/// Provider connection settings.
///
/// `host`, `api_username`, `api_key` and `cpanel_host` are required; every
/// other field has a default.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Reseller API hostname, without scheme.
    #[serde(default)]
    pub host: String,

    /// API username issued by the provider.
    #[serde(default)]
    pub api_username: String,

    /// API key issued by the provider.
    #[serde(default)]
    pub api_key: String,

    /// Hostname of the end-user control panel.
    #[serde(default)]
    pub cpanel_host: String,

    /// Explicit API port. Omitted from URLs when it is the scheme default.
    #[serde(default)]
    pub port: Option<u16>,

    /// Use `https` for API calls and login URLs.
    #[serde(default = "default_true")]
    pub secure: bool,

    /// Account username prefix assigned by the provider. Reference only.
    #[serde(default)]
    pub username_prefix: Option<String>,

    #[serde(default)]
    pub surface: ApiSurface,

    #[serde(default)]
    pub auth_mode: AuthMode,

    /// Verify TLS certificates and hostnames.
    #[serde(default = "default_true")]
    pub verify_tls: bool,

    /// Whether the provider answers `accountstatus` for synchronization.
    #[serde(default = "default_true")]
    pub synchronize_supported: bool,

    /// Ask the provider to keep DNS records when an account is removed.
    #[serde(default)]
    pub keep_dns_on_cancel: bool,

    /// Append `.php` to action paths.
    #[serde(default = "default_true")]
    pub php_extension: bool,

    /// Request timeout in seconds. Account creation is slow on the provider.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Port of the reseller panel on `host`.
    #[serde(default = "default_reseller_panel_port")]
    pub reseller_panel_port: u16,

    /// Display name used in error messages.
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    90
}

fn default_reseller_panel_port() -> u16 {
    2087
}

fn default_provider_name() -> String {
    "MOFH".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            api_username: String::new(),
            api_key: String::new(),
            cpanel_host: String::new(),
            port: None,
            secure: true,
            username_prefix: None,
            surface: ApiSurface::default(),
            auth_mode: AuthMode::default(),
            verify_tls: true,
            synchronize_supported: true,
            keep_dns_on_cancel: false,
            php_extension: true,
            timeout_secs: default_timeout_secs(),
            reseller_panel_port: default_reseller_panel_port(),
            provider_name: default_provider_name(),
        }
    }
}

impl ProviderConfig {
    /// Creates a configuration with the required fields set.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        api_username: impl Into<String>,
        api_key: impl Into<String>,
        cpanel_host: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            api_username: api_username.into(),
            api_key: api_key.into(),
            cpanel_host: cpanel_host.into(),
            ..Self::default()
        }
    }

    /// URL scheme for API calls and login URLs.
    #[must_use]
    pub const fn scheme(&self) -> &'static str {
        if self.secure {
            "https"
        } else {
            "http"
        }
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Host with surrounding whitespace and trailing slashes removed.
    #[must_use]
    pub fn normalized_host(&self) -> &str {
        self.host.trim().trim_end_matches('/')
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("api_username", &self.api_username)
            .field("api_key", &"<redacted>")
            .field("cpanel_host", &self.cpanel_host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("surface", &self.surface)
            .field("auth_mode", &self.auth_mode)
            .field("verify_tls", &self.verify_tls)
            .field("synchronize_supported", &self.synchronize_supported)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}
