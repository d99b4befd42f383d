//! MCP server implementation
//!
//! This module provides the MCP server that dispatches JSON-RPC requests to
//! the tools held in a [`ToolRegistry`].

use crate::args::CallArguments;
use crate::registry::ToolRegistry;
use crate::types::*;
use async_trait::async_trait;
use strimzi_resources::StoreError;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// MCP server error types.
#[derive(Debug, Error)]
pub enum McpServerError {
    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Resource store call failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl McpServerError {
    /// Shorthand for a missing required argument.
    pub fn missing(argument: &str) -> Self {
        McpServerError::InvalidParams(format!("Missing required argument: {}", argument))
    }
}

impl From<serde_json::Error> for McpServerError {
    fn from(err: serde_json::Error) -> Self {
        McpServerError::Internal(err.to_string())
    }
}

/// Result type for MCP server operations.
pub type McpServerResult<T> = Result<T, McpServerError>;

/// Trait for tool implementations.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with given arguments.
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult>;

    /// Execute and fold any failure into an error result.
    async fn call(&self, args: &CallArguments) -> ToolResult {
        match self.execute(args).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = %self.definition().name, error = %e, "Tool call failed");
                ToolResult::error(e.to_string())
            }
        }
    }
}

/// MCP server.
///
/// Answers `initialize`, `ping`, `tools/list` and `tools/call`; everything
/// a tool does happens inside [`Tool::call`].
pub struct McpServer {
    /// Server info
    info: ServerInfo,

    /// Server capabilities
    capabilities: ServerCapabilities,

    /// Registered tools
    registry: ToolRegistry,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(name: impl Into<String>, version: impl Into<String>, registry: ToolRegistry) -> Self {
        Self {
            info: ServerInfo {
                name: name.into(),
                version: version.into(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolCapabilities {
                    list_changed: false,
                }),
            },
            registry,
        }
    }

    /// Create with this crate's name and version.
    pub fn strimzi(registry: ToolRegistry) -> Self {
        Self::new("strimzi-mcp", env!("CARGO_PKG_VERSION"), registry)
    }

    /// Get all tool descriptors.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.registry.descriptors()
    }

    /// Execute a tool by name.
    ///
    /// Only an unknown name is an error; tool failures come back as error
    /// results.
    #[instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: CallArguments,
    ) -> McpServerResult<ToolResult> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| McpServerError::ToolNotFound(name.to_string()))?;

        debug!("Executing tool");
        let result = tool.call(&arguments).await;
        if result.is_error {
            info!("Tool returned an error result");
        }
        Ok(result)
    }

    /// Handle an MCP request. Notifications produce no response.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        let Some(id) = request.id else {
            debug!(method = %request.method, "Notification received");
            return None;
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => McpResponse::success(id, serde_json::json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => McpResponse::error(id, McpError::method_not_found(&request.method)),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: RequestId) -> McpResponse {
        McpResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": self.capabilities,
                "serverInfo": self.info
            }),
        )
    }

    fn handle_tools_list(&self, id: RequestId) -> McpResponse {
        let tools = self.list_tools();
        McpResponse::success(id, serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(
        &self,
        id: RequestId,
        params: Option<serde_json::Value>,
    ) -> McpResponse {
        let params = match params {
            Some(p) => p,
            None => return McpResponse::error(id, McpError::invalid_params("Missing params")),
        };

        let call: ToolCall = match serde_json::from_value(params) {
            Ok(c) => c,
            Err(e) => return McpResponse::error(id, McpError::invalid_params(e.to_string())),
        };

        match self.call_tool(&call.name, call.arguments.into()).await {
            Ok(result) => match serde_json::to_value(result) {
                Ok(value) => McpResponse::success(id, value),
                Err(e) => McpResponse::error(id, McpError::internal_error(e.to_string())),
            },
            Err(e @ McpServerError::ToolNotFound(_)) => {
                McpResponse::error(id, McpError::invalid_params(e.to_string()))
            }
            Err(e) => McpResponse::error(id, McpError::internal_error(e.to_string())),
        }
    }

    /// Get server info.
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Get server capabilities.
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echo the message argument").with_schema(
                r#"{"type": "object", "properties": {"message": {"type": "string"}}, "required": ["message"]}"#,
            )
        }

        async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
            let message = args
                .string("message")
                .ok_or_else(|| McpServerError::missing("message"))?;
            Ok(ToolResult::text(message))
        }
    }

    struct BrokenStoreTool;

    #[async_trait]
    impl Tool for BrokenStoreTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("broken", "Always fails")
        }

        async fn execute(&self, _args: &CallArguments) -> McpServerResult<ToolResult> {
            Err(StoreError::Unavailable("connection refused".to_string()).into())
        }
    }

    fn server() -> McpServer {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool)).unwrap();
        registry.register(Arc::new(BrokenStoreTool)).unwrap();
        McpServer::strimzi(registry)
    }

    #[tokio::test]
    async fn test_server_creation() {
        let server = server();
        assert_eq!(server.info().name, "strimzi-mcp");
        assert_eq!(server.list_tools().len(), 2);
    }

    #[tokio::test]
    async fn test_call_tool() {
        let args = CallArguments::from(serde_json::json!({"message": "hi"}));
        let result = server().call_tool("echo", args).await.unwrap();
        assert!(!result.is_error);
        assert_eq!(result.joined_text(), "hi");
    }

    #[tokio::test]
    async fn test_missing_argument_is_error_result() {
        let result = server()
            .call_tool("echo", CallArguments::default())
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.joined_text().contains("message"));
    }

    #[tokio::test]
    async fn test_store_failure_is_contained() {
        let result = server()
            .call_tool("broken", CallArguments::default())
            .await
            .unwrap();
        assert!(result.is_error);
        assert!(result.joined_text().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let err = server()
            .call_tool("nope", CallArguments::default())
            .await
            .unwrap_err();
        assert!(matches!(err, McpServerError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_handle_request() {
        let server = server();

        let resp = server
            .handle_request(McpRequest::new("1", "initialize"))
            .await
            .unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "strimzi-mcp");

        let resp = server
            .handle_request(McpRequest::new(2i64, "resources/list"))
            .await
            .unwrap();
        assert_eq!(resp.error.unwrap().code, McpError::METHOD_NOT_FOUND);

        assert!(server
            .handle_request(McpRequest::notification("notifications/initialized"))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_tools_call_request() {
        let server = server();
        let req = McpRequest::new(3i64, "tools/call").with_params(serde_json::json!({
            "name": "echo",
            "arguments": {"message": "hello"}
        }));

        let resp = server.handle_request(req).await.unwrap();
        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "hello");

        let req = McpRequest::new(4i64, "tools/call")
            .with_params(serde_json::json!({"name": "missing_tool"}));
        let resp = server.handle_request(req).await.unwrap();
        assert_eq!(resp.error.unwrap().code, McpError::INVALID_PARAMS);
    }
}
