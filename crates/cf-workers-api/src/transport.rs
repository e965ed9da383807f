//! Transport trait and the reqwest-backed implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::request::ProviderRequest;
use crate::response::ProviderResponse;
use crate::{Config, Error, Result};

/// Sends one [`ProviderRequest`] and returns the parsed answer.
///
/// Implementations perform exactly one attempt; there is no retry layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse>;
}

/// HTTP transport over a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    config: Arc<Config>,
    client: reqwest::Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the underlying client cannot be built
    /// (e.g. TLS backend initialisation failure).
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cf-workers-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn with_client(config: Arc<Config>, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        let url = self.config.endpoint_url(&request.path)?;
        let headers = header_map(&request)?;

        tracing::debug!(method = %request.method, path = %request.path, "Sending provider request");

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body.as_bytes().to_vec());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::debug!(status, bytes = body.len(), "Received provider response");

        ProviderResponse::from_parts(status, &body)
    }
}

fn header_map(request: &ProviderRequest) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(request.headers.len());
    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::InvalidArgument(format!("header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::InvalidArgument(format!("header value for '{name}': {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
