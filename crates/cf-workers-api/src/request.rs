//! Outbound provider request

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::multipart::MultipartForm;
use crate::{Config, Result};

/// HTTP methods used by the Workers API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Request body variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    Json(String),
    Multipart(Vec<u8>),
}

impl RequestBody {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Json(text) => text.as_bytes(),
            Self::Multipart(bytes) => bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A fully built call against the provider API.
///
/// `path` is relative to [`Config::api_base`]. Headers always include
/// `Authorization`; a `Content-Type` is present whenever there is a body.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    pub method: Method,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: RequestBody,
}

impl ProviderRequest {
    pub fn new(config: &Config, method: Method, path: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), config.authorization());
        Self {
            method,
            path: path.into(),
            headers,
            body: RequestBody::Empty,
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Propagates serialization failures of `body`.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let text = serde_json::to_string(body)?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = RequestBody::Json(text);
        Ok(self)
    }

    /// Attach a multipart body; the declared boundary comes from `form`.
    #[must_use]
    pub fn multipart(mut self, form: &MultipartForm) -> Self {
        self.headers
            .insert("Content-Type".to_string(), form.content_type());
        self.body = RequestBody::Multipart(form.encode());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Debug for ProviderRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Authorization and secret-bearing bodies stay out of logs.
        let headers: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        f.debug_struct("ProviderRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &headers)
            .field("body_len", &self.body.as_bytes().len())
            .finish()
    }
}
