//! Hosting account entity.

use super::Package;
use serde::{Deserialize, Serialize};

/// Hosting account owned by the host platform.
///
/// The server manager reads most fields. It only writes `username` (the
/// provider assigns the real one at creation) and `suspended` (status sync).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostingAccount {
    /// Current account username. Before creation this is the suggestion.
    pub username: String,

    /// Username suggested to the provider at creation time.
    pub suggested_username: Option<String>,

    /// Primary domain of the account.
    pub domain: String,

    /// Control panel password (never logged).
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Contact email of the owning client.
    pub client_email: String,

    /// Hosting plan of the account.
    pub package: Package,

    /// Free-form note, used as the suspension reason.
    pub note: Option<String>,

    /// Whether the account is suspended on the provider.
    #[serde(default)]
    pub suspended: bool,
}

impl HostingAccount {
    /// Creates a new, not yet provisioned account.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        domain: impl Into<String>,
        password: impl Into<String>,
        client_email: impl Into<String>,
        package: Package,
    ) -> Self {
        Self {
            username: username.into(),
            suggested_username: None,
            domain: domain.into(),
            password: password.into(),
            client_email: client_email.into(),
            package,
            note: None,
            suspended: false,
        }
    }

    /// Sets the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Username to suggest to the provider at creation.
    #[must_use]
    pub fn creation_username(&self) -> &str {
        self.suggested_username.as_deref().unwrap_or(&self.username)
    }

    /// Adopts the username the provider actually assigned.
    ///
    /// Returns `true` when it differs from the one previously held.
    pub fn adopt_provider_username(&mut self, actual: impl Into<String>) -> bool {
        let actual = actual.into();
        if actual == self.username {
            return false;
        }
        if self.suggested_username.is_none() {
            self.suggested_username = Some(std::mem::replace(&mut self.username, actual));
        } else {
            self.username = actual;
        }
        true
    }
}
