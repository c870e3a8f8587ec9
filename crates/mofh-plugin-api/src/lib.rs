//! # MOFH Plugin API
//!
//! Interface between the billing platform and a hosting provider's server
//! manager. The platform owns accounts and packages; a server manager turns
//! its lifecycle calls into remote provider operations.

pub mod form;

pub use form::*;

use async_trait::async_trait;
use mofh_core::{HostingAccount, MofhResult, Package, PackageSummary};
use serde::{Deserialize, Serialize};

/// Plugin descriptor containing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDescriptor {
    /// Unique plugin key.
    pub key: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Plugin version (semver).
    pub version: String,
    /// Plugin description.
    pub description: String,
    /// Plugin author.
    pub author: String,
}

/// Lifecycle contract every server manager implements.
///
/// Operations issue at most one remote call each (package checks add one
/// listing call) and surface the first failure without retrying.
#[async_trait]
pub trait ServerManager: Send + Sync {
    /// Returns the plugin descriptor.
    fn descriptor(&self) -> &PluginDescriptor;

    /// URL of the end-user control panel.
    fn login_url(&self, account: Option<&HostingAccount>) -> String;

    /// URL of the provider's reseller panel.
    fn reseller_login_url(&self, account: Option<&HostingAccount>) -> String;

    /// Suggests a username for a new account on `domain`.
    ///
    /// Purely local. The provider may assign a different one.
    fn generate_username(&self, domain: &str) -> String;

    /// Checks that the provider accepts the configured credentials.
    async fn test_connection(&self) -> MofhResult<bool>;

    /// Refreshes the account's status from the provider.
    async fn synchronize_account(&self, account: &HostingAccount) -> MofhResult<HostingAccount>;

    /// Provisions the account. The provider's username is written back.
    async fn create_account(&self, account: &mut HostingAccount) -> MofhResult<()>;

    /// Suspends the account.
    async fn suspend_account(&self, account: &HostingAccount) -> MofhResult<()>;

    /// Lifts a suspension.
    async fn unsuspend_account(&self, account: &HostingAccount) -> MofhResult<()>;

    /// Terminates the account.
    async fn cancel_account(&self, account: &HostingAccount) -> MofhResult<()>;

    /// Moves the account to another package.
    async fn change_account_package(&self, account: &HostingAccount, package: &Package) -> MofhResult<()>;

    /// Sets a new control panel password.
    async fn change_account_password(&self, account: &HostingAccount, new_password: &str) -> MofhResult<()>;

    /// Renames the account.
    async fn change_account_username(&self, account: &HostingAccount, new_username: &str) -> MofhResult<()>;

    /// Moves the account to another primary domain.
    async fn change_account_domain(&self, account: &HostingAccount, new_domain: &str) -> MofhResult<()>;

    /// Moves the account to another IP address.
    async fn change_account_ip(&self, account: &HostingAccount, new_ip: &str) -> MofhResult<()>;

    /// Lists the hosting packages available on the provider.
    async fn get_packages(&self) -> MofhResult<Vec<PackageSummary>>;
}
