//! A typical deployment: upload, bind a route, set a secret, tear down.

use std::sync::Arc;

use cf_workers_api::HttpTransport;
use cf_workers_mcp::{Dispatcher, ToolResult};
use cf_workers_test_utils::{MockProvider, envelope};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

const SCRIPT: &str = "export default { async fetch() { return new Response('hello') } }";

fn dispatcher_for(provider: &MockProvider) -> Dispatcher {
    let config = Arc::new(provider.config());
    let transport = HttpTransport::new(config.clone()).unwrap();
    Dispatcher::new(config, Arc::new(transport))
}

fn expect_ok(result: &ToolResult) -> String {
    assert!(!result.is_error(), "unexpected failure: {}", result.text_content());
    result.text_content()
}

#[tokio::test]
async fn test_deploy_and_teardown() {
    let provider = MockProvider::start().await;
    let script_path = "/accounts/test-account/workers/scripts/hello";

    Mock::given(method("PUT"))
        .and(path(script_path))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope::success(json!({"id": "hello"}))),
        )
        .expect(1)
        .mount(provider.server())
        .await;
    Mock::given(method("POST"))
        .and(path("/zones/zone1/workers/routes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope::success(json!({"id": "route9"}))),
        )
        .expect(1)
        .mount(provider.server())
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{script_path}/settings")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope::success(json!({}))))
        .expect(1)
        .mount(provider.server())
        .await;
    Mock::given(method("DELETE"))
        .and(path("/zones/zone1/workers/routes/route9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope::success(Value::Null)))
        .expect(1)
        .mount(provider.server())
        .await;
    Mock::given(method("DELETE"))
        .and(path(script_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope::success(Value::Null)))
        .expect(1)
        .mount(provider.server())
        .await;

    let dispatcher = dispatcher_for(&provider);

    let uploaded = dispatcher
        .invoke(
            "workers_script_upload",
            json!({"script_name": "hello", "script_content": SCRIPT, "compatibility_flags": ["nodejs_compat"]}),
        )
        .await;
    let uploaded: Value = serde_json::from_str(&expect_ok(&uploaded)).unwrap();
    assert_eq!(uploaded["id"], "hello");

    let route = dispatcher
        .invoke(
            "workers_route_create",
            json!({"zone_id": "zone1", "pattern": "hello.example.com/*", "script_name": "hello"}),
        )
        .await;
    let route: Value = serde_json::from_str(&expect_ok(&route)).unwrap();
    let route_id = route["id"].as_str().unwrap().to_string();

    let secret = dispatcher
        .invoke(
            "workers_secret_put",
            json!({"script_name": "hello", "secret_name": "TOKEN", "secret_value": "abc"}),
        )
        .await;
    assert_eq!(expect_ok(&secret), "Secret 'TOKEN' set for worker 'hello'");

    let unrouted = dispatcher
        .invoke(
            "workers_route_delete",
            json!({"zone_id": "zone1", "route_id": route_id}),
        )
        .await;
    assert_eq!(expect_ok(&unrouted), "Route 'route9' deleted successfully");

    let deleted = dispatcher
        .invoke("workers_script_delete", json!({"script_name": "hello"}))
        .await;
    assert_eq!(
        expect_ok(&deleted),
        "Worker script 'hello' deleted successfully"
    );

    // Upload body carries the metadata part and the module part
    let received = provider.received().await;
    let upload = received
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let content_type = upload
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    let boundary = content_type
        .strip_prefix("multipart/form-data; boundary=")
        .unwrap();
    let body = String::from_utf8(upload.body.clone()).unwrap();
    assert!(body.starts_with(&format!("--{boundary}\r\n")));
    assert!(body.ends_with(&format!("--{boundary}--\r\n")));
    assert!(body.contains("\"main_module\":\"worker.js\""));
    assert!(body.contains("\"compatibility_flags\":[\"nodejs_compat\"]"));
    assert!(body.contains(SCRIPT));
}
