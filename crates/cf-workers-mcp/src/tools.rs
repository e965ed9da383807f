//! MCP tool registry
//!
//! The catalog published through `tools/list`. Each descriptor also carries
//! the [`OperationKind`] it dispatches to, so the published list and the
//! dispatch table are the same data.
//!
//! # Tool Categories
//!
//! ## Scripts
//! - `workers_script_upload` - Create or replace a Worker script
//! - `workers_script_delete` - Delete a Worker script
//! - `workers_script_get` - Fetch a Worker script
//! - `workers_scripts_list` - List scripts in the account
//!
//! ## Routes
//! - `workers_route_create` - Bind a script to a URL pattern
//! - `workers_route_list` - List routes of a zone
//! - `workers_route_delete` - Remove a route
//!
//! ## Secrets
//! - `workers_secret_put` - Set a secret binding
//! - `workers_secret_delete` - Remove a secret binding
//!
//! ## Logs
//! - `workers_tail_start` - One-shot tail snapshot (not a live stream)

use std::collections::HashMap;

use cf_workers_api::OperationKind;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Tool descriptor for the MCP protocol
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(skip)]
    pub kind: OperationKind,
}

/// Result from a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a successful text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
            is_error: None,
        }
    }

    /// Create an error result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: Some(true),
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Concatenated text of all content blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Ordered tool catalog with a by-name index
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ToolRegistry {
    /// Registry with every Workers tool, in declaration order
    pub fn builtin() -> Self {
        let tools = tool_definitions();
        let index = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name.clone(), i))
            .collect();
        Self { tools, index }
    }

    pub fn list_tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn lookup(&self, name: &str) -> Option<OperationKind> {
        self.get(name).map(|tool| tool.kind)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

fn tool(name: &str, description: &str, kind: OperationKind, input_schema: Value) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
        kind,
    }
}

fn script_name_property(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

fn zone_id_property() -> Value {
    json!({
        "type": "string",
        "description": "Cloudflare Zone ID (domain)"
    })
}

fn tool_definitions() -> Vec<ToolDescriptor> {
    vec![
        // Scripts
        tool(
            "workers_script_upload",
            "Create or update a Cloudflare Worker script. This uploads the worker code and creates/updates the worker.",
            OperationKind::ScriptUpload,
            json!({
                "type": "object",
                "properties": {
                    "script_name": script_name_property(
                        "Name of the worker script (alphanumeric, hyphens, underscores)"
                    ),
                    "script_content": {
                        "type": "string",
                        "description": "JavaScript module code for the worker"
                    },
                    "compatibility_date": {
                        "type": "string",
                        "description": "Compatibility date (YYYY-MM-DD format). Default: 2024-01-01"
                    },
                    "compatibility_flags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Optional compatibility flags"
                    }
                },
                "required": ["script_name", "script_content"]
            }),
        ),
        tool(
            "workers_script_delete",
            "Delete a Cloudflare Worker script.",
            OperationKind::ScriptDelete,
            json!({
                "type": "object",
                "properties": {
                    "script_name": script_name_property("Name of the worker script to delete")
                },
                "required": ["script_name"]
            }),
        ),
        tool(
            "workers_script_get",
            "Get details and code of a specific Worker script.",
            OperationKind::ScriptGet,
            json!({
                "type": "object",
                "properties": {
                    "script_name": script_name_property("Name of the worker script")
                },
                "required": ["script_name"]
            }),
        ),
        tool(
            "workers_scripts_list",
            "List all Worker scripts in the account.",
            OperationKind::ScriptsList,
            json!({
                "type": "object",
                "properties": {}
            }),
        ),
        // Routes
        tool(
            "workers_route_create",
            "Create a route to bind a Worker to a domain/URL pattern.",
            OperationKind::RouteCreate,
            json!({
                "type": "object",
                "properties": {
                    "zone_id": zone_id_property(),
                    "pattern": {
                        "type": "string",
                        "description": "URL pattern (e.g., 'example.com/*' or 'api.example.com/*')"
                    },
                    "script_name": script_name_property("Name of the worker script to bind")
                },
                "required": ["zone_id", "pattern", "script_name"]
            }),
        ),
        tool(
            "workers_route_list",
            "List all routes for a specific zone.",
            OperationKind::RouteList,
            json!({
                "type": "object",
                "properties": {
                    "zone_id": zone_id_property()
                },
                "required": ["zone_id"]
            }),
        ),
        tool(
            "workers_route_delete",
            "Delete a Worker route.",
            OperationKind::RouteDelete,
            json!({
                "type": "object",
                "properties": {
                    "zone_id": zone_id_property(),
                    "route_id": {
                        "type": "string",
                        "description": "Route ID to delete"
                    }
                },
                "required": ["zone_id", "route_id"]
            }),
        ),
        // Secrets
        tool(
            "workers_secret_put",
            "Set an environment variable (secret) for a Worker.",
            OperationKind::SecretPut,
            json!({
                "type": "object",
                "properties": {
                    "script_name": script_name_property("Name of the worker script"),
                    "secret_name": {
                        "type": "string",
                        "description": "Environment variable name"
                    },
                    "secret_value": {
                        "type": "string",
                        "description": "Environment variable value"
                    }
                },
                "required": ["script_name", "secret_name", "secret_value"]
            }),
        ),
        tool(
            "workers_secret_delete",
            "Delete an environment variable (secret) from a Worker.",
            OperationKind::SecretDelete,
            json!({
                "type": "object",
                "properties": {
                    "script_name": script_name_property("Name of the worker script"),
                    "secret_name": {
                        "type": "string",
                        "description": "Environment variable name to delete"
                    }
                },
                "required": ["script_name", "secret_name"]
            }),
        ),
        // Logs
        tool(
            "workers_tail_start",
            "Get a one-shot snapshot of tail sessions for a Worker. This is not a live log stream.",
            OperationKind::TailFetch,
            json!({
                "type": "object",
                "properties": {
                    "script_name": script_name_property("Name of the worker script"),
                    "limit": {
                        "type": "number",
                        "description": "Number of log entries to retrieve (default: 100). Currently not forwarded to the API."
                    }
                },
                "required": ["script_name"]
            }),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_tool_definitions_count() {
        // 4 scripts + 3 routes + 2 secrets + 1 tail
        assert_eq!(ToolRegistry::builtin().len(), 10);
    }

    #[test]
    fn test_declaration_order_is_stable() {
        let names: Vec<String> = ToolRegistry::builtin()
            .list_tools()
            .iter()
            .map(|t| t.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                "workers_script_upload",
                "workers_script_delete",
                "workers_script_get",
                "workers_scripts_list",
                "workers_route_create",
                "workers_route_list",
                "workers_route_delete",
                "workers_secret_put",
                "workers_secret_delete",
                "workers_tail_start",
            ]
        );
    }

    #[test]
    fn test_names_and_kinds_unique() {
        let registry = ToolRegistry::builtin();
        let names: HashSet<_> = registry.list_tools().iter().map(|t| &t.name).collect();
        let kinds: HashSet<_> = registry.list_tools().iter().map(|t| t.kind).collect();
        assert_eq!(names.len(), registry.len());
        assert_eq!(kinds.len(), registry.len());
    }

    #[test]
    fn test_lookup() {
        let registry = ToolRegistry::builtin();
        assert_eq!(
            registry.lookup("workers_secret_put"),
            Some(OperationKind::SecretPut)
        );
        assert_eq!(registry.lookup("nonexistent_tool"), None);
        assert_eq!(registry.lookup("WORKERS_SECRET_PUT"), None);
    }

    #[test]
    fn test_each_tool_has_valid_schema() {
        for tool in ToolRegistry::builtin().list_tools() {
            let schema = tool.input_schema.as_object().unwrap();
            assert_eq!(
                schema.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "Tool {} schema type should be 'object'",
                tool.name
            );
            let properties = schema.get("properties").and_then(Value::as_object).unwrap();
            if let Some(required) = schema.get("required").and_then(Value::as_array) {
                for field in required {
                    let field = field.as_str().unwrap();
                    assert!(
                        properties.contains_key(field),
                        "Tool {} requires undeclared field {}",
                        tool.name,
                        field
                    );
                }
            }
        }
    }

    #[test]
    fn test_descriptor_serializes_mcp_shape() {
        let registry = ToolRegistry::builtin();
        let json = serde_json::to_value(registry.get("workers_route_list").unwrap()).unwrap();
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_tool_result_serialize() {
        let result = ToolResult::text("Hello, world!");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("Hello, world!"));
        assert!(!json.contains("isError"));

        let error_json = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(error_json["isError"], true);
        assert_eq!(error_json["content"][0]["type"], "text");
        assert_eq!(error_json["content"][0]["text"], "boom");
    }

    #[test]
    fn test_tool_result_deserialize() {
        let json = r#"{"content": [{"type": "text", "text": "Result text"}], "isError": false}"#;
        let result: ToolResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.text_content(), "Result text");
    }
}
