//! MOFH server manager.

use crate::client::MofhApiClient;
use crate::packages::parse_packages;
use crate::request::{Action, Params};
use crate::response::DecodedResponse;
use crate::transport::{HttpTransport, Transport};
use crate::username;
use async_trait::async_trait;
use mofh_config::{ConfigValidator, ProviderConfig};
use mofh_core::{HostingAccount, MofhError, MofhResult, Package, PackageSummary};
use mofh_plugin_api::{ConfigForm, FieldType, FormField, PluginDescriptor, ServerManager};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Suspension reason used when the account has no note.
pub const DEFAULT_SUSPEND_REASON: &str = "Suspended by billing system";

/// Places a successful `createacct` may report the assigned username.
const VP_USERNAME_PATHS: &[&str] = &[
    "vp_username",
    "result.vp_username",
    "result.options.vp_username",
    "options.vp_username",
];

/// Server manager for MyOwnFreeHost resellers.
pub struct MofhServerManager<T = HttpTransport> {
    client: MofhApiClient<T>,
    descriptor: PluginDescriptor,
}

impl MofhServerManager<HttpTransport> {
    /// Validates the configuration and creates the manager.
    ///
    /// Fails with a configuration error before any network activity.
    pub fn new(config: ProviderConfig) -> MofhResult<Self> {
        ConfigValidator::ensure_provider(&config)?;
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> MofhServerManager<T> {
    /// Creates the manager over a custom transport.
    pub fn with_transport(config: ProviderConfig, transport: T) -> MofhResult<Self> {
        ConfigValidator::ensure_provider(&config)?;

        let descriptor = PluginDescriptor {
            key: "mofh".to_string(),
            name: "MyOwnFreeHost".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: format!("Provision and manage {} reseller hosting accounts", config.provider_name),
            author: "MOFH Server Manager Team".to_string(),
        };

        Ok(Self {
            client: MofhApiClient::new(Arc::new(config), transport),
            descriptor,
        })
    }

    /// Settings the platform collects for this manager.
    #[must_use]
    pub fn config_form() -> ConfigForm {
        ConfigForm {
            label: "MyOwnFreeHost".to_string(),
            fields: vec![
                FormField::required("api_username", FieldType::Text, "API Username", "mofh_xxxxxxx"),
                FormField::required("api_key", FieldType::Password, "API Key", "Reseller API key"),
                FormField::optional("username_prefix", FieldType::Text, "Username Prefix", "abcd_"),
                FormField::required("cpanel_host", FieldType::Text, "Control Panel Host", "cpanel.example.com"),
                FormField::required("host", FieldType::Text, "API Host", "panel.myownfreehost.net"),
                FormField::optional("port", FieldType::Number, "API Port", "443"),
                FormField::optional("secure", FieldType::Checkbox, "Use SSL", ""),
                FormField::select("surface", "API Format", &["json", "xml"]),
                FormField::select("auth_mode", "Authentication", &["basic", "parameters"]),
                FormField::optional("verify_tls", FieldType::Checkbox, "Verify TLS Certificate", ""),
                FormField::optional("synchronize_supported", FieldType::Checkbox, "Synchronize Accounts", ""),
            ],
        }
    }

    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        self.client.config()
    }

    #[must_use]
    pub fn client(&self) -> &MofhApiClient<T> {
        &self.client
    }

    fn provider(&self) -> String {
        self.config().provider_name.clone()
    }

    /// Lists the provider's packages.
    pub async fn list_packages(&self) -> MofhResult<Vec<PackageSummary>> {
        let response = self.client.call(Action::ListPackages, Vec::new()).await?;
        Ok(parse_packages(response.as_ref()))
    }

    /// Checks that `package` exists on the provider.
    ///
    /// The manager never creates packages: with `create_if_missing` a missing
    /// package is an error asking the reseller to create it.
    pub async fn check_package_exists(&self, package: &Package, create_if_missing: bool) -> MofhResult<bool> {
        let exists = self
            .list_packages()
            .await?
            .iter()
            .any(|summary| summary.name == package.name);

        if !exists && create_if_missing {
            error!("Package {} does not exist on the {} server", package.name, self.provider());
            return Err(MofhError::PackageNotFound {
                name: package.name.clone(),
                provider: self.provider(),
            });
        }
        Ok(exists)
    }

    /// Version reported by the provider API.
    pub async fn provider_version(&self) -> MofhResult<Option<String>> {
        let response = self.client.call(Action::Version, Vec::new()).await?;
        Ok(response.get_text("version"))
    }

    async fn account_call(
        &self,
        action: Action,
        account: &HostingAccount,
        mut extra: Params,
    ) -> MofhResult<Box<dyn DecodedResponse>> {
        let mut params: Params = vec![("user", account.username.clone())];
        params.append(&mut extra);
        self.client.call(action, params).await
    }

    fn warn_on_foreign_prefix(&self, username: &str) {
        if let Some(prefix) = self.config().username_prefix.as_deref().filter(|p| !p.is_empty()) {
            if !username.starts_with(prefix) {
                warn!("Assigned username {} does not carry the configured prefix {}", username, prefix);
            }
        }
    }
}

/// Suspension state reported by `accountstatus`, if recognizable.
fn reported_suspension(response: &dyn DecodedResponse) -> Option<bool> {
    if let Some(flag) = response.get_text("suspended") {
        match flag.to_lowercase().as_str() {
            "1" | "true" | "yes" => return Some(true),
            "0" | "false" | "no" => return Some(false),
            _ => {}
        }
    }

    for path in ["account_status", "status", "result.status"] {
        if let Some(status) = response.get_text(path) {
            match status.to_lowercase().as_str() {
                "suspended" | "suspend" => return Some(true),
                "active" => return Some(false),
                _ => {}
            }
        }
    }
    None
}

#[async_trait]
impl<T: Transport + 'static> ServerManager for MofhServerManager<T> {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    fn login_url(&self, _account: Option<&HostingAccount>) -> String {
        let config = self.config();
        format!("{}://{}", config.scheme(), config.cpanel_host.trim().trim_end_matches('/'))
    }

    fn reseller_login_url(&self, _account: Option<&HostingAccount>) -> String {
        let config = self.config();
        format!("{}://{}:{}", config.scheme(), config.normalized_host(), config.reseller_panel_port)
    }

    fn generate_username(&self, domain: &str) -> String {
        username::generate_username(domain)
    }

    async fn test_connection(&self) -> MofhResult<bool> {
        self.client.call(Action::ListPackages, Vec::new()).await?;
        Ok(true)
    }

    async fn synchronize_account(&self, account: &HostingAccount) -> MofhResult<HostingAccount> {
        if !self.config().synchronize_supported {
            return Err(MofhError::unsupported("synchronizeAccount", self.provider()));
        }

        info!("Synchronizing account: {}", account.username);
        let response = match self.account_call(Action::AccountStatus, account, Vec::new()).await {
            Ok(response) => response,
            Err(e @ MofhError::Provider { .. }) => {
                warn!("Could not synchronize account {}: {}", account.username, e);
                return Ok(account.clone());
            }
            Err(e) => return Err(e),
        };

        let mut synced = account.clone();
        match reported_suspension(response.as_ref()) {
            Some(suspended) => {
                synced.suspended = suspended;
                info!("Account {} is {}", account.username, if suspended { "suspended" } else { "active" });
            }
            None => warn!("Status of account {} not found in the API response", account.username),
        }
        Ok(synced)
    }

    async fn create_account(&self, account: &mut HostingAccount) -> MofhResult<()> {
        info!("Creating account with suggested username: {}", account.creation_username());

        self.check_package_exists(&account.package, true).await?;

        let params: Params = vec![
            ("username", account.creation_username().to_string()),
            ("domain", account.domain.clone()),
            ("password", account.password.clone()),
            ("contactemail", account.client_email.clone()),
            ("plan", account.package.name.clone()),
        ];
        let response = self.client.call(Action::CreateAccount, params).await?;

        let assigned = VP_USERNAME_PATHS.iter().find_map(|path| response.get_text(path));
        match assigned {
            Some(actual) => {
                self.warn_on_foreign_prefix(&actual);
                if account.adopt_provider_username(actual) {
                    info!(
                        "Provider assigned username {} instead of {}",
                        account.username,
                        account.creation_username()
                    );
                }
                info!("Account created successfully with username: {}", account.username);
            }
            None => error!(
                "MOFH API successful response did not include vp_username. Account username may be incorrect."
            ),
        }
        Ok(())
    }

    async fn suspend_account(&self, account: &HostingAccount) -> MofhResult<()> {
        let reason = account
            .note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
            .unwrap_or(DEFAULT_SUSPEND_REASON)
            .to_string();
        info!("Suspending account: {}", account.username);
        self.account_call(Action::SuspendAccount, account, vec![("reason", reason)]).await?;
        Ok(())
    }

    async fn unsuspend_account(&self, account: &HostingAccount) -> MofhResult<()> {
        info!("Unsuspending account: {}", account.username);
        self.account_call(Action::UnsuspendAccount, account, Vec::new()).await?;
        Ok(())
    }

    async fn cancel_account(&self, account: &HostingAccount) -> MofhResult<()> {
        info!("Removing account: {}", account.username);
        let keepdns = if self.config().keep_dns_on_cancel { "1" } else { "0" };
        self.account_call(Action::RemoveAccount, account, vec![("keepdns", keepdns.to_string())])
            .await?;
        Ok(())
    }

    async fn change_account_package(&self, account: &HostingAccount, package: &Package) -> MofhResult<()> {
        info!("Changing package of account {} to {}", account.username, package.name);
        self.check_package_exists(package, true).await?;
        self.account_call(Action::ChangePackage, account, vec![("pkg", package.name.clone())])
            .await?;
        Ok(())
    }

    async fn change_account_password(&self, account: &HostingAccount, new_password: &str) -> MofhResult<()> {
        info!("Changing password of account: {}", account.username);
        let response = self
            .account_call(Action::ChangePassword, account, vec![("pass", new_password.to_string())])
            .await?;

        // passwd nests its own status next to the generic one.
        let failed = response
            .get("passwd.status")
            .is_some_and(|status| status.is_zero_or_false());
        if failed {
            let message = response
                .get_text("passwd.statusmsg")
                .unwrap_or_else(|| crate::classifier::UNKNOWN_ERROR.to_string());
            return Err(self.client.provider_error(Action::ChangePassword, message));
        }
        Ok(())
    }

    async fn change_account_username(&self, _account: &HostingAccount, _new_username: &str) -> MofhResult<()> {
        Err(MofhError::unsupported("changeAccountUsername", self.provider()))
    }

    async fn change_account_domain(&self, _account: &HostingAccount, _new_domain: &str) -> MofhResult<()> {
        Err(MofhError::unsupported("changeAccountDomain", self.provider()))
    }

    async fn change_account_ip(&self, _account: &HostingAccount, _new_ip: &str) -> MofhResult<()> {
        Err(MofhError::unsupported("changeAccountIp", self.provider()))
    }

    async fn get_packages(&self) -> MofhResult<Vec<PackageSummary>> {
        self.list_packages().await
    }
}
