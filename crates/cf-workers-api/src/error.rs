//! Error types for cf-workers-api

/// Result type for cf-workers-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, sending or interpreting a provider call
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required startup configuration is missing or malformed
    #[error("configuration error: {message}")]
    Config { message: String },

    /// A tool argument failed validation before any request was built
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The provider rejected the call (non-2xx status or `success: false`)
    #[error("CF API Error: {detail}")]
    Provider { status: u16, detail: String },

    /// The provider answered with a body that is not JSON
    #[error("invalid provider response (HTTP {status}): {reason}")]
    InvalidResponse { status: u16, reason: String },

    // Transparent wrappers for underlying crate errors
    /// Connection, TLS or body-read failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API base or request path did not form a valid URL
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// HTTP status reported by the provider, when the call got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } | Self::InvalidResponse { status, .. } => Some(*status),
            _ => None,
        }
    }
}
