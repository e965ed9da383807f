//! Full MCP sessions driven through the line-oriented server loop.

use std::sync::Arc;

use cf_workers_api::HttpTransport;
use cf_workers_mcp::{Dispatcher, WorkersMcpServer};
use cf_workers_test_utils::{MockProvider, envelope};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn server_for(provider: &MockProvider) -> WorkersMcpServer {
    let config = Arc::new(provider.config());
    let transport = HttpTransport::new(config.clone()).unwrap();
    WorkersMcpServer::new(Dispatcher::new(config, Arc::new(transport)))
}

/// Feed `messages` one per line and collect the parsed replies.
async fn run_session(server: &WorkersMcpServer, messages: &[Value]) -> Vec<Value> {
    let input: String = messages.iter().map(|m| format!("{m}\n")).collect();
    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_handshake_list_and_call() {
    let provider = MockProvider::start().await;
    provider
        .respond(
            "GET",
            "/accounts/test-account/workers/scripts",
            200,
            envelope::success(json!([
                envelope::script_entry("alpha"),
                envelope::script_entry("beta")
            ])),
        )
        .await;
    let server = server_for(&provider);

    let replies = run_session(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "integration", "version": "0.0.1"}
            }}),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
                "name": "workers_scripts_list", "arguments": {}
            }}),
        ],
    )
    .await;

    // The notification produces no line
    assert_eq!(replies.len(), 3);
    assert_eq!(replies[0]["result"]["serverInfo"]["name"], "cf-workers-mcp");
    assert_eq!(replies[1]["result"]["tools"].as_array().unwrap().len(), 10);

    let text = replies[2]["result"]["content"][0]["text"].as_str().unwrap();
    let scripts: Value = serde_json::from_str(text).unwrap();
    let ids: Vec<&str> = scripts
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["alpha", "beta"]);
}

#[tokio::test]
async fn test_failures_do_not_end_the_session() {
    let provider = MockProvider::start().await;
    provider
        .respond(
            "GET",
            "/accounts/test-account/workers/scripts/missing",
            404,
            envelope::failure(10007, "This Worker does not exist on your account."),
        )
        .await;
    let server = server_for(&provider);

    let replies = run_session(
        &server,
        &[
            json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call", "params": {
                "name": "workers_script_get", "arguments": {"script_name": "missing"}
            }}),
            json!({"jsonrpc": "2.0", "id": 2, "method": "resources/list"}),
            json!({"jsonrpc": "2.0", "id": 3, "method": "tools/call", "params": {
                "name": "workers_unknown", "arguments": {}
            }}),
            json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}),
        ],
    )
    .await;

    assert_eq!(replies.len(), 4);

    assert_eq!(replies[0]["result"]["isError"], true);
    let text = replies[0]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error: CF API Error: "));
    assert!(text.contains("does not exist"));

    assert_eq!(replies[1]["error"]["code"], -32601);
    assert_eq!(replies[2]["result"]["isError"], true);
    assert_eq!(replies[3]["id"], 4);
    assert_eq!(replies[3]["result"], json!({}));

    // Only the first call reached the provider
    assert_eq!(provider.received().await.len(), 1);
}
