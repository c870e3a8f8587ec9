//! Configuration validation module.
//!
//! Provides validation for all configuration values, failing fast on
//! invalid configuration rather than at the first API call.

use crate::{MofhConfig, ProviderConfig};
use mofh_core::telemetry::LoggingConfig;
use mofh_core::MofhError;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A required field is empty.
    MissingField { name: &'static str },
    /// Hostname cannot be used to build a URL.
    InvalidHost { name: &'static str, message: String },
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: &'static str, value: u16 },
    /// Timeout is outside the accepted range.
    TimeoutOutOfRange { value: u64, minimum: u64, maximum: u64 },
    /// Username prefix contains characters the provider never assigns.
    InvalidUsernamePrefix { value: String },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { name } => {
                write!(f, "Missing required setting: {}", name)
            }
            Self::InvalidHost { name, message } => {
                write!(f, "Invalid {}: {}", name, message)
            }
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::TimeoutOutOfRange {
                value,
                minimum,
                maximum,
            } => {
                write!(
                    f,
                    "Timeout of {} seconds is out of range (must be between {} and {})",
                    value, minimum, maximum
                )
            }
            Self::InvalidUsernamePrefix { value } => {
                write!(
                    f,
                    "Invalid username prefix: '{}' (letters, digits and '_' only)",
                    value
                )
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Result of configuration validation containing all errors found.
#[derive(Debug)]
pub struct ValidationResult {
    errors: Vec<ConfigValidationError>,
}

impl ValidationResult {
    fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn add_error(&mut self, error: ConfigValidationError) {
        self.errors.push(error);
    }

    /// Converts to Result, returning Err with all errors if any exist.
    pub fn into_result(self) -> Result<(), Vec<ConfigValidationError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Shortest accepted request timeout.
    const MIN_TIMEOUT_SECS: u64 = 1;
    /// Longest accepted request timeout.
    const MAX_TIMEOUT_SECS: u64 = 300;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];

    /// Validates the entire configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &MofhConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::new();

        Self::check_provider(&config.provider, &mut result);
        Self::check_logging(&config.logging, &mut result);

        result.into_result()
    }

    /// Validates provider settings only.
    pub fn validate_provider(config: &ProviderConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut result = ValidationResult::new();
        Self::check_provider(config, &mut result);
        result.into_result()
    }

    /// Validates provider settings, folding every problem into one
    /// configuration error.
    pub fn ensure_provider(config: &ProviderConfig) -> Result<(), MofhError> {
        Self::validate_provider(config)
            .map_err(|errors| MofhError::Configuration(format_validation_errors(&errors)))
    }

    fn check_provider(config: &ProviderConfig, result: &mut ValidationResult) {
        // Required credentials
        let required: [(&'static str, &str); 4] = [
            ("host", &config.host),
            ("api_username", &config.api_username),
            ("api_key", &config.api_key),
            ("cpanel_host", &config.cpanel_host),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                result.add_error(ConfigValidationError::MissingField { name });
            }
        }

        if !config.host.trim().is_empty() {
            Self::check_host("host", config.normalized_host(), result);
        }
        if !config.cpanel_host.trim().is_empty() {
            Self::check_host("cpanel_host", config.cpanel_host.trim().trim_end_matches('/'), result);
        }

        if config.port == Some(0) {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "port",
                value: 0,
            });
        }
        if config.reseller_panel_port == 0 {
            result.add_error(ConfigValidationError::InvalidPort {
                name: "reseller_panel_port",
                value: 0,
            });
        }

        if !(Self::MIN_TIMEOUT_SECS..=Self::MAX_TIMEOUT_SECS).contains(&config.timeout_secs) {
            result.add_error(ConfigValidationError::TimeoutOutOfRange {
                value: config.timeout_secs,
                minimum: Self::MIN_TIMEOUT_SECS,
                maximum: Self::MAX_TIMEOUT_SECS,
            });
        }

        if let Some(ref prefix) = config.username_prefix {
            if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                result.add_error(ConfigValidationError::InvalidUsernamePrefix {
                    value: prefix.clone(),
                });
            }
        }

        if config.provider_name.trim().is_empty() {
            result.add_error(ConfigValidationError::MissingField {
                name: "provider_name",
            });
        }
    }

    /// Hostnames are configured bare; scheme, port and path come from other
    /// settings.
    fn check_host(name: &'static str, host: &str, result: &mut ValidationResult) {
        if host.contains("://") {
            result.add_error(ConfigValidationError::InvalidHost {
                name,
                message: format!("'{}' must not include a scheme", host),
            });
            return;
        }

        match Url::parse(&format!("https://{}", host)) {
            Ok(url) if url.path() == "/" && url.port().is_none() && url.query().is_none() => {}
            Ok(_) => result.add_error(ConfigValidationError::InvalidHost {
                name,
                message: format!("'{}' must be a bare hostname", host),
            }),
            Err(e) => result.add_error(ConfigValidationError::InvalidHost {
                name,
                message: format!("'{}': {}", host, e),
            }),
        }
    }

    fn check_logging(config: &LoggingConfig, result: &mut ValidationResult) {
        let level = config.level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            result.add_error(ConfigValidationError::InvalidLogLevel {
                value: config.level.clone(),
            });
        }
    }
}

/// Formats validation errors for display.
pub fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    let mut output = String::from("The MOFH server manager is not fully configured:\n");
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", i + 1, error));
    }
    output
}
