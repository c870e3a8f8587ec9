//! # MOFH Client
//!
//! Server manager for MyOwnFreeHost reseller hosting.
//!
//! Every lifecycle operation goes through the same pipeline: build an
//! authenticated request, send it, decode the XML or JSON body, scan it for
//! the provider's error conventions, then pick out the few fields the caller
//! needs.

pub mod classifier;
pub mod client;
pub mod manager;
pub mod packages;
pub mod request;
pub mod response;
pub mod transport;
pub mod username;

pub use client::MofhApiClient;
pub use manager::MofhServerManager;
pub use request::{Action, HttpMethod, ProviderRequest};
pub use response::{DecodedResponse, FieldValue};
pub use transport::{HttpTransport, RawResponse, Transport, TransportFailure};
