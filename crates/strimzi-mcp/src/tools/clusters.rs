//! Kafka cluster tools
//!
//! Listing and inspecting `Kafka` resources, resolving their bootstrap
//! addresses, and working with the pods Strimzi runs for them.

use super::common::{
    age, conditions_json, metadata_json, not_found, required, DescribeTool, ListTool, Summarize,
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
use strimzi_resources::{labels, HasConditions, Kafka, Pod, Repository};
use tracing::{info, instrument};

fn mode(kafka: &Kafka) -> &'static str {
    if kafka.is_kraft() {
        "KRaft"
    } else {
        "ZooKeeper"
    }
}

impl Summarize for Kafka {
    fn summary_line(&self) -> String {
        let replicas = self
            .declared_replicas()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "node pools".to_string());
        format!(
            "{} (namespace: {}, version: {}, brokers: {}, mode: {}, status: {}, age: {})",
            self.name_any(),
            self.namespace().unwrap_or_default(),
            self.spec.kafka.version.as_deref().unwrap_or("default"),
            replicas,
            mode(self),
            self.readiness().label(),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "kafkaVersion": self.spec.kafka.version,
            "replicas": self.declared_replicas(),
            "mode": mode(self),
            "listeners": self.spec.kafka.listeners.iter().map(|l| json!({
                "name": l.name,
                "port": l.port,
                "type": l.type_,
                "tls": l.tls,
            })).collect::<Vec<_>>(),
            "status": {
                "ready": self.is_ready(),
                "clusterId": status.and_then(|s| s.cluster_id.clone()),
                "kafkaVersion": status.and_then(|s| s.kafka_version.clone()),
                "metadataState": status.and_then(|s| s.kafka_metadata_state.clone()),
                "nodePools": status
                    .map(|s| s.kafka_node_pools.iter().map(|p| p.name.clone()).collect::<Vec<_>>())
                    .unwrap_or_default(),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

fn pod_line(pod: &Pod) -> String {
    let status = pod.status.as_ref();
    let phase = status
        .and_then(|s| s.phase.as_deref())
        .unwrap_or("Unknown");
    let containers = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();
    let ready = containers.iter().filter(|c| c.ready).count();
    let restarts: i32 = containers.iter().map(|c| c.restart_count).sum();
    let role = pod
        .labels()
        .get(labels::NAME)
        .cloned()
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{} ({}, ready {}/{}, restarts {}, component {}, age {})",
        pod.name_any(),
        phase,
        ready,
        containers.len(),
        restarts,
        role,
        age(&pod.metadata)
    )
}

const CLUSTER_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "cluster": {"type": "string", "description": "Kafka cluster name"},
        "namespace": {"type": "string", "description": "Namespace; the server default when omitted"}
    },
    "required": ["cluster"]
}"#;

/// Tool returning the bootstrap address of each listener.
pub struct GetBootstrapServersTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for GetBootstrapServersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "get_bootstrap_servers",
            "Get the bootstrap server addresses of a Kafka cluster, per listener",
        )
        .with_category("clusters")
        .with_schema(
            r#"{
                "type": "object",
                "properties": {
                    "cluster": {"type": "string", "description": "Kafka cluster name"},
                    "namespace": {"type": "string", "description": "Namespace; the server default when omitted"},
                    "listener": {"type": "string", "description": "Only this listener"}
                },
                "required": ["cluster"]
            }"#,
        )
    }

    #[instrument(skip(self, args), fields(tool = "get_bootstrap_servers"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let cluster = required(args, "cluster")?;
        let namespace = self.ctx.namespace(args);
        let listener = args.non_empty_string("listener");

        let Some(kafka) = self.ctx.repo::<Kafka>().get(&namespace, &cluster).await? else {
            return Ok(not_found("Kafka cluster", &cluster, &namespace));
        };

        let lines: Vec<String> = kafka
            .listener_statuses()
            .iter()
            .filter(|l| listener.is_none() || l.name == listener)
            .filter_map(|l| {
                let servers = l.bootstrap_servers.clone().or_else(|| {
                    (!l.addresses.is_empty()).then(|| {
                        l.addresses
                            .iter()
                            .map(|a| format!("{}:{}", a.host, a.port))
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                })?;
                Some(format!(
                    "- {}: {}",
                    l.name.as_deref().unwrap_or("unnamed"),
                    servers
                ))
            })
            .collect();

        if lines.is_empty() {
            return Ok(ToolResult::text(format!(
                "No bootstrap addresses reported yet for Kafka cluster '{}' in namespace '{}'",
                cluster, namespace
            )));
        }

        Ok(ToolResult::text(format!(
            "Bootstrap servers for '{}':\n{}",
            cluster,
            lines.join("\n")
        )))
    }
}

/// Tool listing the pods of a Kafka cluster.
pub struct ListClusterPodsTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for ListClusterPodsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "list_cluster_pods",
            "List the pods Strimzi runs for a Kafka cluster with phase, readiness and restarts",
        )
        .with_category("clusters")
        .with_schema(CLUSTER_SCHEMA)
    }

    #[instrument(skip(self, args), fields(tool = "list_cluster_pods"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let cluster = required(args, "cluster")?;
        let namespace = self.ctx.namespace(args);

        let pods = self
            .ctx
            .repo::<Pod>()
            .list(Some(namespace.as_str()), Some(labels::CLUSTER), Some(cluster.as_str()))
            .await?;

        if pods.is_empty() {
            return Ok(ToolResult::text(format!(
                "No pods found for cluster '{}' in namespace '{}'",
                cluster, namespace
            )));
        }

        let mut lines = vec![format!("Found {} pod(s) for cluster '{}':", pods.len(), cluster)];
        lines.extend(pods.iter().map(|p| format!("- {}", pod_line(p))));
        Ok(ToolResult::text(lines.join("\n")))
    }
}

/// Tool restarting one broker by deleting its pod.
pub struct RestartBrokerTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for RestartBrokerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "restart_broker",
            "Restart a Kafka broker by deleting its pod; Strimzi recreates it",
        )
        .with_category("clusters")
        .with_schema(
            r#"{
                "type": "object",
                "properties": {
                    "cluster": {"type": "string", "description": "Kafka cluster name"},
                    "broker_id": {"type": "integer", "description": "Broker (node) ID"},
                    "namespace": {"type": "string", "description": "Namespace; the server default when omitted"},
                    "confirm": {"type": "boolean", "description": "Must be true to restart"}
                },
                "required": ["cluster", "broker_id", "confirm"],
                "additionalProperties": false
            }"#,
        )
    }

    #[instrument(skip(self, args), fields(tool = "restart_broker"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let cluster = required(args, "cluster")?;
        let broker_id = args
            .optional_int("broker_id")
            .ok_or_else(|| McpServerError::missing("broker_id"))?;
        let namespace = self.ctx.namespace(args);

        if !args.bool_or("confirm", false) {
            return Ok(ToolResult::error(format!(
                "Restarting broker {} of '{}' disrupts clients; call again with confirm=true",
                broker_id, cluster
            )));
        }

        let pods = self.ctx.repo::<Pod>();
        let suffix = format!("-{}", broker_id);
        let target = pods
            .list(Some(namespace.as_str()), Some(labels::CLUSTER), Some(cluster.as_str()))
            .await?
            .into_iter()
            .filter(|p| labels::is_broker_pod(p.metadata.labels.as_ref(), &cluster))
            .map(|p| p.name_any())
            .find(|name| name.ends_with(&suffix));

        let Some(pod_name) = target else {
            return Ok(ToolResult::error(format!(
                "Broker {} of cluster '{}' not found in namespace '{}'",
                broker_id, cluster, namespace
            )));
        };

        pods.delete(&namespace, &pod_name).await?;
        info!(pod = %pod_name, "Deleted broker pod");

        Ok(ToolResult::text(format!(
            "Deleted pod '{}' (broker {}); Strimzi will recreate it",
            pod_name, broker_id
        )))
    }
}

/// Kafka cluster tools.
pub struct ClusterTools {
    ctx: ToolContext,
}

impl ClusterTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for ClusterTools {
    fn group(&self) -> &'static str {
        "clusters"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        let ctx = &self.ctx;
        vec![
            Arc::new(ListTool::<Kafka>::new(
                ctx.clone(),
                "list_kafka_clusters",
                "List Strimzi Kafka clusters with version, broker count and readiness",
                "clusters",
                "Kafka clusters",
            )),
            Arc::new(DescribeTool::<Kafka>::new(
                ctx.clone(),
                "describe_kafka_cluster",
                "Describe a Kafka cluster: listeners, mode, node pools and conditions",
                "clusters",
                "Kafka cluster",
            )),
            Arc::new(GetBootstrapServersTool { ctx: ctx.clone() }),
            Arc::new(ListClusterPodsTool { ctx: ctx.clone() }),
            Arc::new(RestartBrokerTool { ctx: ctx.clone() }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::PodStatus;
    use std::collections::BTreeMap;
    use strimzi_resources::{
        Condition, KafkaClusterSpec, KafkaSpec, KafkaStatus, ListenerStatus, MemoryStore,
    };

    fn ctx() -> ToolContext {
        ToolContext::new(Arc::new(MemoryStore::new()), "kafka")
    }

    async fn broker_pod(ctx: &ToolContext, cluster: &str, id: u32) {
        let mut pod = Pod::default();
        pod.metadata.name = Some(format!("{}-kafka-{}", cluster, id));
        pod.metadata.labels = Some(BTreeMap::from([
            (labels::CLUSTER.to_string(), cluster.to_string()),
            (labels::NAME.to_string(), format!("{}-kafka", cluster)),
        ]));
        pod.status = Some(PodStatus {
            phase: Some("Running".to_string()),
            ..Default::default()
        });
        ctx.repo::<Pod>().create("kafka", &pod).await.unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_servers() {
        let ctx = ctx();
        let mut kafka = Kafka::new(
            "my-cluster",
            KafkaSpec {
                kafka: KafkaClusterSpec {
                    replicas: Some(3),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        kafka.status = Some(KafkaStatus {
            conditions: vec![Condition::ready()],
            listeners: vec![ListenerStatus {
                name: Some("plain".to_string()),
                bootstrap_servers: Some("my-cluster-kafka-bootstrap.kafka.svc:9092".to_string()),
                addresses: vec![],
            }],
            ..Default::default()
        });
        ctx.repo::<Kafka>().create("kafka", &kafka).await.unwrap();

        let tool = GetBootstrapServersTool { ctx: ctx.clone() };
        let result = tool
            .call(&CallArguments::from(json!({"cluster": "my-cluster"})))
            .await;
        assert!(!result.is_error);
        assert!(result
            .joined_text()
            .contains("- plain: my-cluster-kafka-bootstrap.kafka.svc:9092"));

        let missing = tool
            .call(&CallArguments::from(json!({"cluster": "ghost"})))
            .await;
        assert!(missing.is_error);
        assert!(missing.joined_text().contains("not found"));
    }

    #[tokio::test]
    async fn test_restart_broker_requires_confirm() {
        let ctx = ctx();
        broker_pod(&ctx, "my-cluster", 1).await;
        let tool = RestartBrokerTool { ctx: ctx.clone() };

        let result = tool
            .call(&CallArguments::from(json!({"cluster": "my-cluster", "broker_id": 1})))
            .await;
        assert!(result.is_error);
        assert!(ctx.repo::<Pod>().exists("kafka", "my-cluster-kafka-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_restart_broker_deletes_matching_pod() {
        let ctx = ctx();
        broker_pod(&ctx, "my-cluster", 0).await;
        broker_pod(&ctx, "my-cluster", 1).await;
        let tool = RestartBrokerTool { ctx: ctx.clone() };

        let result = tool
            .call(&CallArguments::from(
                json!({"cluster": "my-cluster", "broker_id": "1", "confirm": true}),
            ))
            .await;
        assert!(!result.is_error, "{}", result.joined_text());

        let pods = ctx.repo::<Pod>();
        assert!(!pods.exists("kafka", "my-cluster-kafka-1").await.unwrap());
        assert!(pods.exists("kafka", "my-cluster-kafka-0").await.unwrap());

        let again = tool
            .call(&CallArguments::from(
                json!({"cluster": "my-cluster", "broker_id": 7, "confirm": true}),
            ))
            .await;
        assert!(again.is_error);
        assert!(again.joined_text().contains("not found"));
    }

    #[tokio::test]
    async fn test_list_cluster_pods() {
        let ctx = ctx();
        broker_pod(&ctx, "my-cluster", 0).await;
        broker_pod(&ctx, "other", 0).await;

        let tool = ListClusterPodsTool { ctx };
        let result = tool
            .call(&CallArguments::from(json!({"cluster": "my-cluster"})))
            .await;
        let text = result.joined_text();
        assert!(text.contains("Found 1 pod(s)"));
        assert!(text.contains("my-cluster-kafka-0 (Running"));
    }
}
