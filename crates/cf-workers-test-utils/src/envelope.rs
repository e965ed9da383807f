//! Provider response envelopes.
//!
//! Every Workers API answer has the shape
//! `{"success": bool, "errors": [...], "messages": [...], "result": ...}`.

use serde_json::{Value, json};

/// Successful envelope wrapping `result`.
pub fn success(result: Value) -> Value {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": result
    })
}

/// Failed envelope carrying a single provider error.
pub fn failure(code: u32, message: &str) -> Value {
    json!({
        "success": false,
        "errors": [{"code": code, "message": message}],
        "messages": [],
        "result": null
    })
}

/// Failed envelope with an empty error list.
pub fn failure_without_errors() -> Value {
    json!({
        "success": false,
        "errors": [],
        "messages": [],
        "result": null
    })
}

/// One entry of a script listing.
pub fn script_entry(id: &str) -> Value {
    json!({
        "id": id,
        "etag": format!("etag-{id}"),
        "created_on": "2024-01-01T00:00:00Z",
        "modified_on": "2024-01-01T00:00:00Z"
    })
}

/// One entry of a route listing.
pub fn route_entry(id: &str, pattern: &str, script: &str) -> Value {
    json!({"id": id, "pattern": pattern, "script": script})
}
