//! Shared test utilities for the cf-workers-mcp workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`envelope`]: provider response envelopes (success and failure)
//! - [`provider`]: [`MockProvider`], a wiremock server posing as the Workers API
//! - [`transport`]: [`RecordingTransport`], an in-memory transport that keeps every request

pub mod envelope;
pub mod provider;
pub mod transport;

pub use provider::{MockProvider, TEST_ACCOUNT_ID, TEST_API_TOKEN};
pub use transport::RecordingTransport;
