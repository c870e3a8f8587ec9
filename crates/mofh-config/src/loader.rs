//! Configuration loader with layered sources.

use crate::{format_validation_errors, ConfigValidator, MofhConfig};
use config::{Config, ConfigError, Environment, File, FileFormat};
use mofh_core::MofhError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<MofhConfig>>,
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{config_dir}/default.toml` - Default values
    /// 2. `{config_dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{config_dir}/local.toml` - Local overrides, never committed
    /// 4. Environment variables with `MOFH__` prefix (`MOFH__PROVIDER__API_KEY`)
    pub fn new(config_dir: impl Into<PathBuf>) -> Result<Self, MofhError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, MofhError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> MofhConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    ///
    /// The previous configuration stays in place when the new one is invalid.
    pub async fn reload(&self) -> Result<(), MofhError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    /// Loads and validates configuration from the specified directory.
    pub fn load_config(config_dir: &Path) -> Result<MofhConfig, MofhError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var("MOFH_ENVIRONMENT").unwrap_or_else(|_| "production".to_string());
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = config_dir.join(format!("{}.toml", name));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("MOFH")
                .separator("__")
                .try_parsing(true),
        );

        let config: MofhConfig = builder
            .build()
            .and_then(|c| c.try_deserialize::<MofhConfig>())
            .map_err(config_error_to_mofh_error)?;

        ConfigValidator::validate(&config)
            .map_err(|errors| MofhError::Configuration(format_validation_errors(&errors)))?;

        Ok(config)
    }
}

fn config_error_to_mofh_error(err: ConfigError) -> MofhError {
    MofhError::Configuration(err.to_string())
}
