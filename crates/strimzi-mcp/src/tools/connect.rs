//! Kafka Connect tools

use super::common::{
    age, cluster_of, conditions_json, metadata_json, not_found, positive_count, required,
    DescribeTool, ListTool, Summarize, DESCRIBE_SCHEMA,
};
use super::ToolContext;
use crate::args::CallArguments;
use crate::registry::ToolFactory;
use crate::server::{McpServerResult, Tool};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use kube::ResourceExt;
use serde_json::{json, Value};
use std::sync::Arc;
use strimzi_resources::{
    labels, HasConditions, KafkaConnect, KafkaConnector, KafkaConnectorSpec, Repository,
};
use tracing::{info, instrument};

impl Summarize for KafkaConnect {
    fn summary_line(&self) -> String {
        format!(
            "{} (replicas: {}, bootstrap: {}, plugins: {}, status: {}, age: {})",
            self.name_any(),
            self.spec.replicas.unwrap_or(3),
            self.spec.bootstrap_servers,
            self.status
                .as_ref()
                .map_or(0, |s| s.connector_plugins.len()),
            self.readiness().label(),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "version": self.spec.version,
            "replicas": self.spec.replicas,
            "bootstrapServers": self.spec.bootstrap_servers,
            "config": self.spec.config,
            "status": {
                "ready": self.is_ready(),
                "url": status.and_then(|s| s.url.clone()),
                "replicas": status.and_then(|s| s.replicas),
                "connectorPlugins": status.map(|s| s.connector_plugins.iter().map(|p| json!({
                    "class": p.class,
                    "type": p.type_,
                    "version": p.version,
                })).collect::<Vec<_>>()).unwrap_or_default(),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

impl Summarize for KafkaConnector {
    fn summary_line(&self) -> String {
        format!(
            "{} (connect: {}, class: {}, tasks: {}, state: {}, status: {})",
            self.name_any(),
            cluster_of(self),
            self.spec.class.as_deref().unwrap_or("-"),
            self.spec.tasks_max.map_or("-".to_string(), |t| t.to_string()),
            self.connector_state().unwrap_or("UNKNOWN"),
            self.readiness().label()
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "connectCluster": cluster_of(self),
            "class": self.spec.class,
            "tasksMax": self.spec.tasks_max,
            "state": self.spec.state,
            "config": self.spec.config,
            "status": {
                "ready": self.is_ready(),
                "connectorState": self.connector_state(),
                "failedTasks": self.failed_tasks(),
                "connectorStatus": status.and_then(|s| s.connector_status.clone()),
                "topics": status.map(|s| s.topics.clone()).unwrap_or_default(),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

/// Tool creating a `KafkaConnector`.
pub struct CreateConnectorTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for CreateConnectorTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "create_connector",
            "Create a KafkaConnector on a Connect cluster that uses connector resources",
        )
        .with_category("connect")
        .with_schema(
            r#"{
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Connector name"},
                    "connect_cluster": {"type": "string", "description": "KafkaConnect cluster that runs the connector"},
                    "class": {"type": "string", "description": "Connector class"},
                    "namespace": {"type": "string", "description": "Namespace; the server default when omitted"},
                    "tasks_max": {"type": "integer", "description": "Maximum number of tasks", "default": 1},
                    "config": {"type": "object", "description": "Connector configuration"}
                },
                "required": ["name", "connect_cluster", "class"]
            }"#,
        )
    }

    #[instrument(skip(self, args), fields(tool = "create_connector"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let connect_cluster = required(args, "connect_cluster")?;
        let class = required(args, "class")?;
        let namespace = self.ctx.namespace(args);
        let tasks_max = positive_count(args, "tasks_max", 1)?;
        let config = args
            .map("config")
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect());

        let mut connector = KafkaConnector::new(
            &name,
            KafkaConnectorSpec {
                class: Some(class.clone()),
                tasks_max: Some(tasks_max),
                config,
                state: None,
            },
        );
        connector.metadata.labels = Some(labels::single(labels::CLUSTER, &connect_cluster));

        self.ctx
            .repo::<KafkaConnector>()
            .create(&namespace, &connector)
            .await?;
        info!(connector = %name, namespace = %namespace, "Created connector");

        Ok(ToolResult::text(format!(
            "Created connector '{}' ({}, {} task(s)) on Connect cluster '{}' in namespace '{}'",
            name, class, tasks_max, connect_cluster, namespace
        )))
    }
}

/// Tool deleting a `KafkaConnector`.
pub struct DeleteConnectorTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for DeleteConnectorTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("delete_connector", "Delete a KafkaConnector")
            .with_category("connect")
            .with_schema(DESCRIBE_SCHEMA)
    }

    #[instrument(skip(self, args), fields(tool = "delete_connector"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let namespace = self.ctx.namespace(args);
        let connectors = self.ctx.repo::<KafkaConnector>();

        if !connectors.exists(&namespace, &name).await? {
            return Ok(not_found("Connector", &name, &namespace));
        }
        connectors.delete(&namespace, &name).await?;
        info!(connector = %name, namespace = %namespace, "Deleted connector");

        Ok(ToolResult::text(format!(
            "Deleted connector '{}' from namespace '{}'",
            name, namespace
        )))
    }
}

/// Kafka Connect tools.
pub struct ConnectTools {
    ctx: ToolContext,
}

impl ConnectTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for ConnectTools {
    fn group(&self) -> &'static str {
        "connect"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(ListTool::<KafkaConnect>::new(
                self.ctx.clone(),
                "list_kafka_connects",
                "List KafkaConnect clusters with replicas and plugin counts",
                "connect",
                "Kafka Connect clusters",
            )),
            Arc::new(DescribeTool::<KafkaConnect>::new(
                self.ctx.clone(),
                "describe_kafka_connect",
                "Describe a KafkaConnect cluster: REST URL, plugins and conditions",
                "connect",
                "Kafka Connect cluster",
            )),
            // `cluster` selects the Connect cluster here
            Arc::new(
                ListTool::<KafkaConnector>::new(
                    self.ctx.clone(),
                    "list_connectors",
                    "List KafkaConnectors with class, task count and connector state",
                    "connect",
                    "connectors",
                )
                .with_cluster_filter(),
            ),
            Arc::new(DescribeTool::<KafkaConnector>::new(
                self.ctx.clone(),
                "describe_connector",
                "Describe a KafkaConnector: configuration, task states and conditions",
                "connect",
                "Connector",
            )),
            Arc::new(CreateConnectorTool {
                ctx: self.ctx.clone(),
            }),
            Arc::new(DeleteConnectorTool {
                ctx: self.ctx.clone(),
            }),
        ]
    }
}
