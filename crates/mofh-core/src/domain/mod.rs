//! Domain entities the host platform hands to the server manager.

mod account;
mod package;

pub use account::*;
pub use package::*;
