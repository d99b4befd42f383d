//! # Strimzi MCP
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! Strimzi-managed Kafka resources on Kubernetes as callable tools.
//!
//! ## Overview
//!
//! The strimzi-mcp crate handles:
//! - **Tools**: list/describe/create/delete tools per Strimzi resource family
//! - **Schemas**: parsing the JSON Schema each tool declares for its arguments
//! - **Registry**: name-unique tool registration from tool factories
//! - **Health**: an ordered pipeline of checkers rendering one text report
//! - **JSON-RPC**: MCP protocol handling over newline-delimited stdio
//!
//! ## MCP Protocol
//!
//! Supported methods:
//! - `initialize`: Initialize the MCP session
//! - `ping`: Liveness probe
//! - `tools/list`: List available tools
//! - `tools/call`: Execute a tool
//!
//! Messages without an `id` are notifications and get no response.
//!
//! ## Tool Groups
//!
//! - `clusters`: Kafka clusters, bootstrap servers, broker pods, broker restart
//! - `nodepools`: KafkaNodePools
//! - `topics`: KafkaTopics
//! - `users`: KafkaUsers and their credentials
//! - `connect`: KafkaConnect clusters and KafkaConnectors
//! - `bridges`: KafkaBridges and KafkaMirrorMaker2
//! - `rebalance`: Cruise Control KafkaRebalances
//! - `health`: the `health_check` report
//!
//! ## Usage
//!
//! ### Writing a Tool
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use strimzi_mcp::{CallArguments, McpServerResult, Tool, ToolDefinition, ToolResult};
//!
//! struct Greet;
//!
//! #[async_trait]
//! impl Tool for Greet {
//!     fn definition(&self) -> ToolDefinition {
//!         ToolDefinition::new("greet", "Say hello").with_schema(
//!             r#"{"type": "object", "properties": {"name": {"type": "string"}}}"#,
//!         )
//!     }
//!
//!     async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
//!         let name = args.string("name").unwrap_or_else(|| "world".to_string());
//!         Ok(ToolResult::text(format!("Hello, {}!", name)))
//!     }
//! }
//! ```
//!
//! ### Handling MCP Requests
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strimzi_mcp::tools::{self, ToolContext};
//! use strimzi_mcp::{McpRequest, McpServer};
//! use strimzi_resources::MemoryStore;
//!
//! async fn handle() -> anyhow::Result<()> {
//!     let ctx = ToolContext::new(Arc::new(MemoryStore::new()), "kafka");
//!     let server = McpServer::strimzi(tools::registry(&ctx)?);
//!
//!     let request = McpRequest::new(1i64, "tools/list");
//!     if let Some(response) = server.handle_request(request).await {
//!         println!("{}", serde_json::to_string(&response)?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod args;
pub mod config;
pub mod health;
pub mod observability;
pub mod registry;
pub mod schema;
pub mod server;
pub mod stdio;
pub mod tools;
pub mod types;

// Re-export main types
pub use args::CallArguments;
pub use config::{ConfigError, LogFormat, ServerConfig};
pub use registry::{RegistryError, ToolFactory, ToolRegistry};
pub use schema::{SchemaDescriptor, SchemaError, SchemaParser};
pub use server::{McpServer, McpServerError, McpServerResult, Tool};
pub use types::{
    ContentBlock, McpError, McpRequest, McpResponse, RequestId, ServerCapabilities, ServerInfo,
    ToolCall, ToolCapabilities, ToolDefinition, ToolDescriptor, ToolResult, PROTOCOL_VERSION,
};

// Re-export health check types
pub use health::{
    HealthCheckContext, HealthCheckPipeline, HealthCheckResult, HealthChecker, Severity,
};
