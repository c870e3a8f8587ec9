//! # MOFH Config
//!
//! Configuration management for the MOFH server manager.
//! Supports layered configuration from files and environment variables,
//! validated up front so a misconfigured manager never issues a request.

mod loader;
mod provider_config;
mod validation;

pub use loader::*;
pub use provider_config::*;
pub use validation::*;
