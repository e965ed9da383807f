//! Tool call dispatch
//!
//! Maps a tool name plus argument bag onto exactly one provider call and
//! turns the outcome into a [`ToolResult`]. Nothing here holds per-call
//! state, so one dispatcher serves concurrent calls.

use std::sync::Arc;

use cf_workers_api::{Config, Operation, Transport};
use serde_json::Value;

use crate::tools::{ToolRegistry, ToolResult};
use crate::{Error, Result};

/// Routes `tools/call` requests to the Workers API.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(config: Arc<Config>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            registry: Arc::new(ToolRegistry::builtin()),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a tool and always produce a result.
    ///
    /// Failures (unknown tool, bad arguments, transport or provider errors)
    /// become an error result with text `Error: <message>`.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolResult {
        match self.try_invoke(name, arguments).await {
            Ok(text) => ToolResult::text(text),
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "Tool call failed");
                ToolResult::error(format!("Error: {e}"))
            }
        }
    }

    /// Run a tool, returning the success text or the failure.
    pub async fn try_invoke(&self, name: &str, arguments: Value) -> Result<String> {
        let kind = self
            .registry
            .lookup(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        let operation = kind.parse(arguments)?;
        if let Operation::TailFetch(args) = &operation {
            tracing::debug!(limit = %args.limit(), "Tail limit is not forwarded to the provider");
        }

        let request = operation.to_request(&self.config)?;
        tracing::debug!(tool = name, method = %request.method, path = %request.path, "Dispatching tool call");

        let response = self.transport.send(request).await?;
        let result = response.into_result()?;

        Ok(operation.render(&result)?)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("tools", &self.registry.len())
            .finish_non_exhaustive()
    }
}
