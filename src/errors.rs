use serde_json::{json, Value};
use thiserror::Error;

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

/// Protocol-tier failures. Each one becomes a JSON-RPC `error` object.
///
/// Domain failures (unknown key name, unset variable) are not represented here;
/// tools report them inside a successful result with `isError` set.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("parse error: {reason}")]
    ParseError { reason: String },
    #[error("invalid params")]
    InvalidParams,
    #[error("method not found: {method}")]
    MethodNotFound { method: String },
    #[error("unknown tool: {name}")]
    UnknownTool { name: String },
}

impl AppError {
    pub fn parse_error(reason: impl Into<String>) -> Self {
        Self::ParseError {
            reason: reason.into(),
        }
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError { .. } => PARSE_ERROR,
            Self::InvalidParams => INVALID_PARAMS,
            Self::MethodNotFound { .. } | Self::UnknownTool { .. } => METHOD_NOT_FOUND,
        }
    }

    /// Message placed in the JSON-RPC error object. The parse failure reason
    /// stays in the logs.
    pub fn rpc_message(&self) -> String {
        match self {
            Self::ParseError { .. } => "Parse error".to_string(),
            Self::InvalidParams => "Invalid params".to_string(),
            Self::MethodNotFound { method } => format!("Method not found: {method}"),
            Self::UnknownTool { name } => format!("Unknown tool: {name}"),
        }
    }

    pub fn data(&self) -> Option<Value> {
        match self {
            Self::UnknownTool { name } => Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": name,
                },
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_json_rpc_reserved_range() {
        assert_eq!(AppError::parse_error("eof").code(), -32700);
        assert_eq!(AppError::InvalidParams.code(), -32602);
        assert_eq!(AppError::method_not_found("ping").code(), -32601);
        assert_eq!(AppError::unknown_tool("nope").code(), -32601);
    }

    #[test]
    fn parse_reason_is_not_exposed_in_rpc_message() {
        let err = AppError::parse_error("expected value at line 1 column 1");
        assert_eq!(err.rpc_message(), "Parse error");
        assert!(err.to_string().contains("line 1 column 1"));
    }

    #[test]
    fn unknown_tool_carries_structured_data() {
        let err = AppError::unknown_tool("nonexistent_tool");
        assert_eq!(err.rpc_message(), "Unknown tool: nonexistent_tool");

        let data = err.data().expect("tool_not_found data");
        assert_eq!(data["code"], "tool_not_found");
        assert_eq!(data["details"]["name"], "nonexistent_tool");
        assert!(AppError::InvalidParams.data().is_none());
    }
}
