//! Outbound request construction.

use mofh_config::{AuthMode, ProviderConfig};
use mofh_core::{MofhError, MofhResult};
use std::fmt;
use url::Url;

/// Parameter keys whose values never appear in logs.
pub(crate) const REDACTED_KEYS: &[&str] = &["api_key", "password", "pass"];

/// Request parameters in the order they are sent.
pub type Params = Vec<(&'static str, String)>;

/// Remote operation offered by the provider API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateAccount,
    SuspendAccount,
    UnsuspendAccount,
    RemoveAccount,
    ChangePassword,
    ChangePackage,
    ListPackages,
    AccountStatus,
    Version,
}

impl Action {
    /// Action name as it appears in the endpoint path.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateAccount => "createacct",
            Self::SuspendAccount => "suspendacct",
            Self::UnsuspendAccount => "unsuspendacct",
            Self::RemoveAccount => "removeacct",
            Self::ChangePassword => "passwd",
            Self::ChangePackage => "changepackage",
            Self::ListPackages => "listpkgs",
            Self::AccountStatus => "accountstatus",
            Self::Version => "version",
        }
    }

    /// Account-scoped actions are POSTed; listings and diagnostics use GET.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        match self {
            Self::ListPackages | Self::Version => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Fields whose presence marks a successful response of this action.
    #[must_use]
    pub const fn success_fields(&self) -> &'static [&'static str] {
        match self {
            Self::CreateAccount => &["vp_username"],
            Self::AccountStatus => &["account_status", "suspended"],
            Self::ListPackages => &["package"],
            Self::Version => &["version"],
            _ => &[],
        }
    }

    /// Field expected to hold a list in the response.
    #[must_use]
    pub const fn list_field(&self) -> Option<&'static str> {
        match self {
            Self::ListPackages => Some("package"),
            _ => None,
        }
    }

    /// Whether a bare top-level list is a valid response.
    #[must_use]
    pub const fn accepts_root_list(&self) -> bool {
        matches!(self, Self::ListPackages)
    }

    /// `accountstatus` legitimately reports strings such as "failed" in its
    /// `result` field.
    #[must_use]
    pub const fn checks_result_text(&self) -> bool {
        !matches!(self, Self::AccountStatus)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// HTTP Basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fully specified outbound call.
///
/// GET requests carry their parameters in the query string, POST requests in
/// a form-encoded body.
#[derive(Clone)]
pub struct ProviderRequest {
    pub action: Action,
    pub method: HttpMethod,
    /// Endpoint without query string.
    pub url: Url,
    pub params: Params,
    pub basic_auth: Option<BasicAuth>,
}

impl ProviderRequest {
    /// Builds the request for `action` with authentication applied.
    pub fn build(config: &ProviderConfig, action: Action, mut params: Params) -> MofhResult<Self> {
        let url = endpoint(config, action)?;

        let basic_auth = match config.auth_mode {
            AuthMode::Basic => Some(BasicAuth {
                username: config.api_username.clone(),
                password: config.api_key.clone(),
            }),
            AuthMode::Parameters => {
                params.push(("api_user", config.api_username.clone()));
                params.push(("api_key", config.api_key.clone()));
                None
            }
        };

        Ok(Self {
            action,
            method: action.method(),
            url,
            params,
            basic_auth,
        })
    }

    /// URL to send the request to, with the query string for GET requests.
    #[must_use]
    pub fn target_url(&self) -> Url {
        let mut url = self.url.clone();
        if self.method == HttpMethod::Get && !self.params.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &self.params {
                query.append_pair(key, value);
            }
        }
        url
    }

    /// Form body of POST requests.
    #[must_use]
    pub fn form_body(&self) -> Option<&Params> {
        match self.method {
            HttpMethod::Post => Some(&self.params),
            HttpMethod::Get => None,
        }
    }

    /// Parameters with credentials and passwords masked, for logging.
    #[must_use]
    pub fn redacted_params(&self) -> Vec<(&'static str, &str)> {
        self.params
            .iter()
            .map(|(key, value)| {
                if REDACTED_KEYS.contains(key) {
                    (*key, "<redacted>")
                } else {
                    (*key, value.as_str())
                }
            })
            .collect()
    }

    /// Value of a parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRequest")
            .field("action", &self.action)
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("params", &self.redacted_params())
            .field("basic_auth", &self.basic_auth)
            .finish()
    }
}

/// `scheme://host[:port]/<surface>/<action>[.php]`
pub fn endpoint(config: &ProviderConfig, action: Action) -> MofhResult<Url> {
    let base = format!("{}://{}", config.scheme(), config.normalized_host());
    let mut url = Url::parse(&base)
        .map_err(|e| MofhError::configuration(format!("Invalid API host '{}': {}", config.host, e)))?;

    // `Url` drops the port from the serialization when it is the scheme default.
    if let Some(port) = config.port {
        url.set_port(Some(port))
            .map_err(|()| MofhError::configuration(format!("Cannot set port {} on '{}'", port, config.host)))?;
    }

    let file = if config.php_extension {
        format!("{}.php", action.name())
    } else {
        action.name().to_string()
    };

    url.path_segments_mut()
        .map_err(|()| MofhError::configuration(format!("Invalid API host '{}'", config.host)))?
        .pop_if_empty()
        .push(config.surface.path_prefix())
        .push(&file);

    Ok(url)
}
