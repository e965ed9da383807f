//! multipart/form-data encoding for script uploads
//!
//! Layout of an encoded body:
//!
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="metadata"\r\n
//! Content-Type: application/json\r\n
//! \r\n
//! {payload}\r\n
//! --{boundary}\r\n
//! ...
//! --{boundary}--\r\n
//! ```

use uuid::Uuid;

const CRLF: &[u8] = b"\r\n";

/// One named part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Part {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    fn disposition(&self) -> String {
        match &self.filename {
            Some(filename) => format!(
                "form-data; name=\"{}\"; filename=\"{}\"",
                escape_quoted(&self.name),
                escape_quoted(filename)
            ),
            None => format!("form-data; name=\"{}\"", escape_quoted(&self.name)),
        }
    }
}

/// Boundary-delimited form; the boundary is fixed at construction time.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// New form with a random boundary token.
    pub fn new() -> Self {
        Self::with_boundary(format!("----cfworkers{}", Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    #[must_use]
    pub fn part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Value for the outer request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn encode(&self) -> Vec<u8> {
        let payload_len: usize = self.parts.iter().map(|p| p.data.len() + 128).sum();
        let mut body = Vec::with_capacity(payload_len + self.boundary.len() + 8);

        for part in &self.parts {
            body.extend_from_slice(b"--");
            body.extend_from_slice(self.boundary.as_bytes());
            body.extend_from_slice(CRLF);
            body.extend_from_slice(format!("Content-Disposition: {}", part.disposition()).as_bytes());
            body.extend_from_slice(CRLF);
            body.extend_from_slice(format!("Content-Type: {}", part.content_type).as_bytes());
            body.extend_from_slice(CRLF);
            body.extend_from_slice(CRLF);
            body.extend_from_slice(&part.data);
            body.extend_from_slice(CRLF);
        }

        body.extend_from_slice(b"--");
        body.extend_from_slice(self.boundary.as_bytes());
        body.extend_from_slice(b"--");
        body.extend_from_slice(CRLF);
        body
    }
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
