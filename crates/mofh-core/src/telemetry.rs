//! Tracing setup for hosts that do not install their own subscriber.
//!
//! The server manager only emits `tracing` events. Provider faults that the
//! operator must look at are emitted at `ERROR`, soft failures at `WARN`,
//! lifecycle operations at `INFO`, and outbound requests at `DEBUG`.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Whether to print the event target.
    #[serde(default = "default_with_target")]
    pub with_target: bool,

    /// Emit one JSON object per event instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            with_target: default_with_target(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Builds the filter directive used when `RUST_LOG` is not set.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("{},mofh={}", self.level, self.level)
    }
}

/// Installs a global fmt subscriber.
///
/// Returns `false` when a global subscriber was already installed, which is
/// the normal case when the host platform configures logging itself.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(config.with_target))
            .try_init()
            .is_ok()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(config.with_target))
            .try_init()
            .is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, "Tracing initialized");
    }
    installed
}
