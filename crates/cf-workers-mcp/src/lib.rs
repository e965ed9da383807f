//! MCP Server for Cloudflare Workers
//!
//! Exposes Cloudflare Workers management via the Model Context Protocol
//! (MCP). Every tool maps onto exactly one Workers API call.
//!
//! # Architecture
//!
//! ```text
//! [ MCP Client (agent/IDE) ]
//!        | (JSON-RPC over stdio)
//!        v
//! [ WorkersMcpServer ] --tools/list--> [ ToolRegistry ]
//!        | tools/call
//!        v
//! [ Dispatcher ] --Operation--> [ cf-workers-api ] --HTTPS--> [ Cloudflare API ]
//! ```
//!
//! # Tools
//!
//! - Scripts: upload, delete, get, list
//! - Routes: create, list, delete
//! - Secrets: put, delete
//! - Logs: one-shot tail snapshot
//!
//! Tool failures never break the JSON-RPC exchange; they come back as
//! results flagged `isError` with text `Error: <message>`.

pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use server::{SERVER_NAME, WorkersMcpServer};
pub use tools::{ToolContent, ToolDescriptor, ToolRegistry, ToolResult};
