//! Health check tool

use super::ToolContext;
use crate::args::CallArguments;
use crate::health::{HealthCheckContext, HealthCheckPipeline};
use crate::registry::ToolFactory;
use crate::server::{McpServerResult, Tool};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Tool running the full health pipeline.
///
/// Findings are part of the report; the result is only an error when the
/// tool itself cannot run.
pub struct HealthCheckTool {
    ctx: ToolContext,
    pipeline: HealthCheckPipeline,
}

impl HealthCheckTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self {
            ctx,
            pipeline: HealthCheckPipeline::standard(),
        }
    }
}

#[async_trait]
impl Tool for HealthCheckTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "health_check",
            "Check the health of Kafka clusters, node pools, topics, users, Connect, bridges and MirrorMaker2",
        )
        .with_category("health")
        .with_schema(
            r#"{
                "type": "object",
                "properties": {
                    "namespace": {"type": "string", "description": "Namespace; the server default when omitted"},
                    "cluster": {"type": "string", "description": "Only this Kafka cluster"},
                    "all_namespaces": {"type": "boolean", "description": "Check every namespace", "default": false}
                }
            }"#,
        )
    }

    #[instrument(skip(self, args), fields(tool = "health_check"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let mut context = HealthCheckContext::new(self.ctx.store());
        if !args.bool_or("all_namespaces", false) {
            context = context.with_namespace(self.ctx.namespace(args));
        }
        if let Some(cluster) = args.non_empty_string("cluster") {
            context = context.with_cluster(cluster);
        }

        let result = self.pipeline.run(&context).await;
        Ok(ToolResult::text(result.format()))
    }
}

/// Health tools.
pub struct HealthTools {
    ctx: ToolContext,
}

impl HealthTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for HealthTools {
    fn group(&self) -> &'static str {
        "health"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![Arc::new(HealthCheckTool::new(self.ctx.clone()))]
    }
}
