//! Interactive tools exposed via Model Context Protocol
//!
//! Provides `get_api_key`, `list_api_keys` and `check_api_key_exists`. Domain
//! failures (unknown key, unset variable) are reported inside a successful
//! `CallToolResult` with `isError` set; only malformed calls become JSON-RPC errors.

use rust_mcp_sdk::schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool};
use serde_json::{json, Map, Value};

use crate::domain::utils::{
    mask_secret, normalize_category, required_key_name, CATEGORY_FILTER_VALUES,
};
use crate::mcp::rpc::{app_error_to_json_rpc, json_rpc_result};
use crate::{
    errors::AppError,
    registry::{Category, Registry, RegistryEntry, CATEGORY_ALL},
    secrets::SecretSource,
    AppState,
};

pub const GET_API_KEY: &str = "get_api_key";
pub const LIST_API_KEYS: &str = "list_api_keys";
pub const CHECK_API_KEY_EXISTS: &str = "check_api_key_exists";

/// Descriptors in a fixed order. The `key_name` enums are drawn from the live
/// registry so they always match what `tools/call` accepts.
pub fn build_tools_list(registry: &Registry) -> Vec<Tool> {
    let key_names = registry.all_names();

    vec![
        tool_descriptor(json!({
            "name": GET_API_KEY,
            "description": "Retrieve an API key by its name. Returns the API key value from environment variables.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "key_name": {
                        "type": "string",
                        "description": "The name of the API key to retrieve (e.g., 'openai', 'stripe', 'canva_client_id')",
                        "enum": key_names,
                    }
                },
                "required": ["key_name"]
            }
        })),
        tool_descriptor(json!({
            "name": LIST_API_KEYS,
            "description": "List all available API key names and their descriptions. Does not return actual key values.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Filter by category: 'llm', 'saas', 'canva', 'internal', or 'all'",
                        "enum": CATEGORY_FILTER_VALUES,
                    }
                },
                "required": []
            }
        })),
        tool_descriptor(json!({
            "name": CHECK_API_KEY_EXISTS,
            "description": "Check if an API key is configured (has a value set) without revealing the key itself.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "key_name": {
                        "type": "string",
                        "description": "The name of the API key to check",
                        "enum": key_names,
                    }
                },
                "required": ["key_name"]
            }
        })),
    ]
}

fn tool_descriptor(descriptor: Value) -> Tool {
    serde_json::from_value(descriptor).expect("static tool descriptor deserialization")
}

pub fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return app_error_to_json_rpc(id, AppError::InvalidParams);
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return app_error_to_json_rpc(id, AppError::InvalidParams),
    };

    let arguments = tool_call.arguments.unwrap_or_default();
    let registry = state.registry.as_ref();
    let secrets = state.secrets.as_ref();

    let result = match tool_call.name.as_str() {
        GET_API_KEY => get_api_key(registry, secrets, &arguments),
        LIST_API_KEYS => list_api_keys(registry, secrets, &arguments),
        CHECK_API_KEY_EXISTS => check_api_key_exists(registry, secrets, &arguments),
        other => return app_error_to_json_rpc(id, AppError::unknown_tool(other)),
    };

    json_rpc_result(
        id,
        serde_json::to_value(result).expect("tool result serialization"),
    )
}

pub fn get_api_key(
    registry: &Registry,
    secrets: &dyn SecretSource,
    arguments: &Map<String, Value>,
) -> CallToolResult {
    let entry = match resolve_entry(registry, arguments) {
        Ok(entry) => entry,
        Err(result) => return result,
    };

    match secrets.configured_value(&entry.source_variable) {
        Some(value) => text_result(value, false),
        None => text_result(
            format!(
                "API key '{}' is not configured. Set the {} environment variable.",
                entry.logical_name, entry.source_variable
            ),
            true,
        ),
    }
}

/// Never includes secret values, only whether each one is set.
pub fn list_api_keys(
    registry: &Registry,
    secrets: &dyn SecretSource,
    arguments: &Map<String, Value>,
) -> CallToolResult {
    let filter = normalize_category(arguments);
    let mut text = String::from("Available API Keys:\n\n");

    for category in Category::ALL {
        if filter != CATEGORY_ALL && filter != category.as_str() {
            continue;
        }

        text.push_str(&format!("{}:\n", category.heading()));
        for entry in registry.filter_by_category(category.as_str()) {
            let marker = if secrets.is_configured(&entry.source_variable) {
                "✅"
            } else {
                "❌"
            };
            text.push_str(&format!(
                "  {marker} {} - {} (env: {})\n",
                entry.logical_name, entry.description, entry.source_variable
            ));
        }
        text.push('\n');
    }

    text_result(text, false)
}

/// Unlike `get_api_key`, an unset variable is an informational outcome here.
pub fn check_api_key_exists(
    registry: &Registry,
    secrets: &dyn SecretSource,
    arguments: &Map<String, Value>,
) -> CallToolResult {
    let entry = match resolve_entry(registry, arguments) {
        Ok(entry) => entry,
        Err(result) => return result,
    };

    let text = match secrets.configured_value(&entry.source_variable) {
        Some(value) => format!(
            "✅ API key '{}' is configured (value: {})",
            entry.logical_name,
            mask_secret(&value)
        ),
        None => format!(
            "❌ API key '{}' is NOT configured. Set {} environment variable.",
            entry.logical_name, entry.source_variable
        ),
    };

    text_result(text, false)
}

fn resolve_entry<'a>(
    registry: &'a Registry,
    arguments: &Map<String, Value>,
) -> Result<&'a RegistryEntry, CallToolResult> {
    let Some(key_name) = required_key_name(arguments) else {
        return Err(text_result("Error: key_name is required".to_string(), true));
    };

    registry.lookup(key_name).ok_or_else(|| {
        text_result(format!("Error: Unknown API key name: {key_name}"), true)
    })
}

fn text_result(text: String, is_error: bool) -> CallToolResult {
    CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: is_error.then_some(true),
        meta: None,
        structured_content: None,
    }
}
