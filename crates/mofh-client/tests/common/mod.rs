//! Shared fixtures for mofh-client integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use mofh_client::{MofhServerManager, ProviderRequest, RawResponse, Transport, TransportFailure};
use mofh_config::ProviderConfig;
use mofh_core::{HostingAccount, Package};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that records every request and answers from a queue.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ProviderRequest>>,
    responses: Mutex<VecDeque<Result<RawResponse, TransportFailure>>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a 200 response with `body`.
    pub fn respond(&self, body: &str) -> &Self {
        self.respond_with(200, body)
    }

    pub fn respond_with(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(TransportFailure::new(message)));
        self
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> ProviderRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was recorded")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn execute(&self, request: &ProviderRequest) -> Result<RawResponse, TransportFailure> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFailure::new("no response queued")))
    }
}

pub fn test_config() -> ProviderConfig {
    ProviderConfig::new(
        "panel.myownfreehost.net",
        "reseller",
        "secret-key",
        "cpanel.example.com",
    )
}

pub fn build_manager(
    config: ProviderConfig,
) -> (MofhServerManager<Arc<RecordingTransport>>, Arc<RecordingTransport>) {
    let transport = RecordingTransport::new();
    let manager =
        MofhServerManager::with_transport(config, transport.clone()).expect("valid config");
    (manager, transport)
}

pub fn test_account() -> HostingAccount {
    HostingAccount::new(
        "example1",
        "example.com",
        "hunter22",
        "owner@example.com",
        Package::new("pro"),
    )
}

pub const PACKAGES: &str = r#"{"package": ["basic", "pro"]}"#;
