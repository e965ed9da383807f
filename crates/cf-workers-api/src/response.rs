//! Provider response normalization
//!
//! The Workers API wraps everything in an envelope:
//! `{"success": bool, "errors": [...], "messages": [...], "result": ...}`.
//! Not every failure honours it (proxies, gateway errors), so the envelope is
//! read defensively and a missing `success` flag counts as failure.

use serde_json::Value;

use crate::{Error, Result};

/// Parsed provider answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub status: u16,
    pub ok: bool,
    pub payload: Value,
    /// The `errors` array, when the payload carries one (possibly empty).
    pub errors: Option<Vec<Value>>,
}

impl ProviderResponse {
    /// Interpret a raw HTTP status and body.
    ///
    /// The body is parsed as JSON regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`] if the body is not valid JSON.
    pub fn from_parts(status: u16, body: &[u8]) -> Result<Self> {
        let payload: Value =
            serde_json::from_slice(body).map_err(|e| Error::InvalidResponse {
                status,
                reason: e.to_string(),
            })?;
        Ok(Self::from_payload(status, payload))
    }

    pub fn from_payload(status: u16, payload: Value) -> Self {
        let success = payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let errors = payload
            .get("errors")
            .and_then(Value::as_array)
            .cloned();

        Self {
            status,
            ok: (200..300).contains(&status) && success,
            payload,
            errors,
        }
    }

    /// Detail text for a failed call: the error list when the provider sent
    /// one (even an empty one), otherwise the whole payload.
    pub fn error_detail(&self) -> String {
        let detail = match &self.errors {
            Some(errors) => serde_json::to_string(errors),
            None => serde_json::to_string(&self.payload),
        };
        detail.unwrap_or_default()
    }

    /// Unwrap the envelope: `result` on success, [`Error::Provider`] otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Provider`] when [`ProviderResponse::ok`] is false.
    pub fn into_result(self) -> Result<Value> {
        if !self.ok {
            return Err(Error::Provider {
                status: self.status,
                detail: self.error_detail(),
            });
        }

        let Self { mut payload, .. } = self;
        Ok(payload
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}
