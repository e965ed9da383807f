//! Cloudflare Workers MCP Server
//!
//! A Model Context Protocol server that lets agents deploy and manage
//! Cloudflare Workers: scripts, routes, secrets and tail snapshots.
//!
//! # Usage
//!
//! ```bash
//! cf-workers-mcp --account-id <id> --api-token <token> [--api-base <url>]
//! ```
//!
//! # Environment Variables
//!
//! - `CF_ACCOUNT_ID`: Cloudflare account id (same as `--account-id`)
//! - `CF_API_TOKEN`: API token with Workers permissions (same as `--api-token`)
//! - `CF_API_BASE`: API base URL override (same as `--api-base`)
//! - `RUST_LOG`: Control log verbosity (default: `cf_workers_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use cf_workers_api::{Config, DEFAULT_API_BASE};
use cf_workers_mcp::WorkersMcpServer;
use clap::Parser;
use url::Url;

/// MCP server for Cloudflare Workers
#[derive(Parser)]
#[command(name = "cf-workers-mcp")]
#[command(about = "MCP server for Cloudflare Workers management")]
#[command(version)]
struct Args {
    /// Cloudflare account id
    #[arg(long, env = "CF_ACCOUNT_ID")]
    account_id: String,

    /// Cloudflare API token
    #[arg(long, env = "CF_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Cloudflare API base URL
    #[arg(long, env = "CF_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: Url,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging to stderr (stdout is reserved for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cf_workers_mcp=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::with_api_base(args.account_id, args.api_token, args.api_base)?;
    tracing::info!(
        account_id = config.account_id(),
        api_base = %config.api_base(),
        "Starting cf-workers-mcp server"
    );

    let server = WorkersMcpServer::from_config(config)?;
    server.run().await?;

    Ok(())
}
