//! Cruise Control rebalance tools

use super::common::{
    age, cluster_of, conditions_json, metadata_json, required, DescribeTool, ListTool, Summarize,
};
use super::ToolContext;
use crate::args::CallArguments;
use crate::registry::ToolFactory;
use crate::server::{McpServerError, McpServerResult, Tool};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use kube::ResourceExt;
use serde_json::{json, Value};
use std::sync::Arc;
use strimzi_resources::{labels, HasConditions, KafkaRebalance, KafkaRebalanceSpec, Repository};
use tracing::{info, instrument};

const MODES: &[&str] = &["full", "add-brokers", "remove-brokers"];

impl Summarize for KafkaRebalance {
    fn summary_line(&self) -> String {
        format!(
            "{} (cluster: {}, mode: {}, state: {}, age: {})",
            self.name_any(),
            cluster_of(self),
            self.spec.mode.as_deref().unwrap_or("full"),
            self.state().unwrap_or("Unknown"),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "cluster": cluster_of(self),
            "mode": self.spec.mode.as_deref().unwrap_or("full"),
            "goals": self.spec.goals,
            "brokers": self.spec.brokers,
            "skipHardGoalCheck": self.spec.skip_hard_goal_check,
            "status": {
                "state": self.state(),
                "sessionId": status.and_then(|s| s.session_id.clone()),
                "optimizationResult": status.and_then(|s| s.optimization_result.clone()),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

/// Parse a comma-separated list of broker IDs.
fn parse_brokers(raw: &str) -> McpServerResult<Vec<i32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| McpServerError::InvalidParams(format!("Invalid broker ID '{}'", s)))
        })
        .collect()
}

/// Tool requesting a rebalance proposal.
pub struct CreateRebalanceTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for CreateRebalanceTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_rebalance",
            "Create a KafkaRebalance so Cruise Control computes an optimization proposal",
        )
        .with_category("rebalance")
        .with_schema(
            r#"{
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Rebalance name"},
                    "cluster": {"type": "string", "description": "Kafka cluster to rebalance"},
                    "namespace": {"type": "string", "description": "Namespace; the server default when omitted"},
                    "mode": {"type": "string", "enum": ["full", "add-brokers", "remove-brokers"], "default": "full"},
                    "brokers": {"type": "string", "description": "Comma-separated broker IDs; required for add-brokers and remove-brokers"},
                    "goals": {"type": "string", "description": "Comma-separated Cruise Control goals"}
                },
                "required": ["name", "cluster"]
            }"#,
        )
    }

    #[instrument(skip(self, args), fields(tool = "create_rebalance"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let cluster = required(args, "cluster")?;
        let namespace = self.ctx.namespace(args);
        let mode = args
            .non_empty_string("mode")
            .unwrap_or_else(|| "full".to_string());

        if !MODES.contains(&mode.as_str()) {
            return Err(McpServerError::InvalidParams(format!(
                "Unsupported mode '{}'; expected one of {}",
                mode,
                MODES.join(", ")
            )));
        }

        let brokers = match args.string("brokers") {
            Some(raw) => parse_brokers(&raw)?,
            None => Vec::new(),
        };
        if mode != "full" && brokers.is_empty() {
            return Err(McpServerError::InvalidParams(format!(
                "Mode '{}' requires at least one broker ID",
                mode
            )));
        }

        let goals = args
            .string("goals")
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let mut rebalance = KafkaRebalance::new(
            &name,
            KafkaRebalanceSpec {
                mode: Some(mode.clone()),
                goals,
                brokers,
                skip_hard_goal_check: None,
            },
        );
        rebalance.metadata.labels = Some(labels::single(labels::CLUSTER, &cluster));

        self.ctx
            .repo::<KafkaRebalance>()
            .create(&namespace, &rebalance)
            .await?;
        info!(rebalance = %name, namespace = %namespace, "Created rebalance");

        Ok(ToolResult::text(format!(
            "Created rebalance '{}' ({}) for cluster '{}' in namespace '{}'; \
             describe it once the proposal is ready",
            name, mode, cluster, namespace
        )))
    }
}

/// Rebalance tools.
pub struct RebalanceTools {
    ctx: ToolContext,
}

impl RebalanceTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for RebalanceTools {
    fn group(&self) -> &'static str {
        "rebalance"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(
                ListTool::<KafkaRebalance>::new(
                    self.ctx.clone(),
                    "list_rebalances",
                    "List KafkaRebalances with mode and lifecycle state",
                    "rebalance",
                    "rebalances",
                )
                .with_cluster_filter(),
            ),
            Arc::new(DescribeTool::<KafkaRebalance>::new(
                self.ctx.clone(),
                "describe_rebalance",
                "Describe a KafkaRebalance: goals, optimization result and conditions",
                "rebalance",
                "Rebalance",
            )),
            Arc::new(CreateRebalanceTool {
                ctx: self.ctx.clone(),
            }),
        ]
    }
}
