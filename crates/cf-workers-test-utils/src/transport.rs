//! [`RecordingTransport`]: a [`Transport`] that never touches the network.

use std::sync::Mutex;

use async_trait::async_trait;
use cf_workers_api::{ProviderRequest, ProviderResponse, Result, Transport};
use serde_json::Value;

use crate::envelope;

/// Records every request and answers each with the same canned envelope.
pub struct RecordingTransport {
    status: u16,
    payload: Value,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    /// Answers `200` with a success envelope whose result is `null`.
    pub fn new() -> Self {
        Self::responding(200, envelope::success(Value::Null))
    }

    pub fn responding(status: u16, payload: Value) -> Self {
        Self {
            status,
            payload,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the requests sent so far, oldest first.
    ///
    /// # Panics
    /// Panics if the lock was poisoned by a panicking test thread.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| panic!("RecordingTransport: poisoned lock: {e}"))
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|e| panic!("RecordingTransport: poisoned lock: {e}"))
            .push(request);
        Ok(ProviderResponse::from_payload(
            self.status,
            self.payload.clone(),
        ))
    }
}
