//! # MOFH Core
//!
//! Core types, domain entities, and error definitions shared by every crate
//! of the MOFH server manager.

pub mod domain;
pub mod error;
pub mod result;
pub mod telemetry;

pub use domain::*;
pub use error::*;
pub use result::*;
