//! Result type aliases for the MOFH server manager.

use crate::MofhError;

/// A specialized `Result` type for server manager operations.
pub type MofhResult<T> = Result<T, MofhError>;
