//! Hosting package entities.

use serde::{Deserialize, Serialize};

/// Hosting plan selected by name at account creation or package change.
///
/// Packages only exist on the provider side; the manager never creates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Remote plan name, matched exactly.
    pub name: String,
    /// Disk quota in bytes.
    pub quota_bytes: Option<u64>,
    /// Monthly bandwidth in bytes.
    pub bandwidth_bytes: Option<u64>,
}

impl Package {
    /// Creates a package reference with no limits attached.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quota_bytes: None,
            bandwidth_bytes: None,
        }
    }
}

/// Package descriptor as reported by the provider's package listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub title: String,
    pub name: String,
    pub quota_bytes: Option<u64>,
    pub bandwidth_bytes: Option<u64>,
}

impl PackageSummary {
    /// Creates a summary for a package known only by name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            quota_bytes: None,
            bandwidth_bytes: None,
        }
    }
}
