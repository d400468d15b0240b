//! The central Model Context Protocol engine
//!
//! Decodes one framed line into a JSON-RPC request, routes it by method
//! (`initialize`, `tools/list`, `tools/call`) and decides whether a response is
//! owed. Requests without an id are handled but never answered.

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ListToolsResult, ProtocolVersion, ServerCapabilities,
    ServerCapabilitiesTools,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::tools::{build_tools_list, handle_tools_call};
use crate::mcp::rpc::{app_error_to_json_rpc, is_json_rpc_error, is_tool_error, json_rpc_result};
use crate::{errors::AppError, AppState};

pub const SUPPORTED_PROTOCOL_VERSION: &str = "2024-11-05";
/// Identity clients already key on; only the version tracks the package.
pub const SERVER_NAME: &str = "api-keys-server";
pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// `None` for notifications; an explicit `null` id counts as absent.
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

pub fn decode_request(line: &[u8]) -> Result<JsonRpcRequest, AppError> {
    let payload: Value =
        serde_json::from_slice(line).map_err(|err| AppError::parse_error(err.to_string()))?;

    if !payload.is_object() {
        return Err(AppError::parse_error("request must be a JSON object"));
    }

    let request: JsonRpcRequest =
        serde_json::from_value(payload).map_err(|err| AppError::parse_error(err.to_string()))?;

    if request.jsonrpc != JSONRPC_VERSION {
        return Err(AppError::parse_error(format!(
            "unsupported jsonrpc version `{}`",
            request.jsonrpc
        )));
    }

    if let Some(id) = &request.id {
        if !(id.is_string() || id.is_number()) {
            return Err(AppError::parse_error("id must be a string or a number"));
        }
    }

    Ok(request)
}

/// Handles one framed line. Returns the response to write, if any.
///
/// Undecodable lines always produce a `-32700` response with a `null` id.
pub fn handle_json_rpc_line(state: &AppState, line: &[u8]) -> Option<Value> {
    let request = match decode_request(line) {
        Ok(request) => request,
        Err(err) => {
            warn!(error = %err, "rejecting undecodable line");
            return Some(app_error_to_json_rpc(None, err));
        }
    };

    let notification = request.is_notification();
    let response = handle_json_rpc_request(state, request.id, &request.method, request.params);

    if notification {
        None
    } else {
        response
    }
}

pub fn handle_json_rpc_request(
    state: &AppState,
    id: Option<Value>,
    method: &str,
    params: Option<Value>,
) -> Option<Value> {
    let audit_params = redact_audit_params(params.as_ref());
    let notification = id.is_none();

    let response = match method {
        "initialize" => Some(json_rpc_result(
            id,
            serde_json::to_value(initialize_result()).expect("initialize result serialization"),
        )),
        "initialized" | "notifications/initialized" => None,
        "tools/list" => Some(json_rpc_result(
            id,
            serde_json::to_value(ListToolsResult {
                meta: None,
                next_cursor: None,
                tools: build_tools_list(&state.registry),
            })
            .expect("tools list result serialization"),
        )),
        "tools/call" => Some(handle_tools_call(state, id, params)),
        _ => Some(app_error_to_json_rpc(id, AppError::method_not_found(method))),
    };

    let outcome = match &response {
        None => "acknowledged",
        Some(value) if is_json_rpc_error(value) => "failure",
        Some(value) if is_tool_error(value) => "tool_error",
        Some(_) => "success",
    };

    info!(
        method = %method,
        params = %audit_params,
        notification,
        outcome,
        "mcp action audited"
    );

    response
}

pub fn initialize_result() -> InitializeResult {
    InitializeResult {
        server_info: Implementation {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: None,
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools {
                list_changed: Some(false),
            }),
            resources: None,
            prompts: None,
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2024_11_05.into(),
        instructions: None,
        meta: None,
    }
}

pub fn redact_audit_params(params: Option<&Value>) -> Value {
    params.map(redact_audit_value).unwrap_or(Value::Null)
}

pub fn redact_audit_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| {
                    if is_sensitive_key(key) {
                        (key.clone(), Value::String("[REDACTED]".to_string()))
                    } else {
                        (key.clone(), redact_audit_value(item))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact_audit_value).collect()),
        _ => value.clone(),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let normalized = key.trim().to_ascii_lowercase();
    matches!(
        normalized.as_str(),
        "authorization" | "bearer" | "credentials" | "credential" | "api_key" | "apikey"
    ) || normalized.contains("token")
        || normalized.contains("secret")
        || normalized.contains("password")
}
