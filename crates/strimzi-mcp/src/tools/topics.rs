//! Topic tools
//!
//! `KafkaTopic` resources are reconciled into Kafka topics by the Topic
//! Operator; creating or deleting the resource creates or deletes the topic.

use super::common::{
    age, cluster_of, conditions_json, metadata_json, not_found, positive_count, required,
    DescribeTool, ListTool, Summarize,
};
use super::ToolContext;
use crate::args::CallArguments;
use crate::registry::ToolFactory;
use crate::server::{McpServerResult, Tool};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use kube::ResourceExt;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use strimzi_resources::{labels, HasConditions, KafkaTopic, KafkaTopicSpec, Repository};
use tracing::{info, instrument};

impl Summarize for KafkaTopic {
    fn summary_line(&self) -> String {
        format!(
            "{} (cluster: {}, partitions: {}, replicas: {}, status: {}, age: {})",
            self.name_any(),
            cluster_of(self),
            self.spec.partitions.map_or("-".to_string(), |p| p.to_string()),
            self.spec.replicas.map_or("-".to_string(), |r| r.to_string()),
            self.readiness().label(),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "cluster": cluster_of(self),
            "topicName": self.spec.topic_name.clone().unwrap_or_else(|| self.name_any()),
            "partitions": self.spec.partitions,
            "replicas": self.spec.replicas,
            "config": self.spec.config,
            "status": {
                "ready": self.is_ready(),
                "topicId": status.and_then(|s| s.topic_id.clone()),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

/// Tool creating a `KafkaTopic`.
pub struct CreateTopicTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for CreateTopicTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("create_topic", "Create a Kafka topic through a KafkaTopic resource")
            .with_category("topics")
            .with_schema(
                r#"{
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Topic name"},
                        "cluster": {"type": "string", "description": "Kafka cluster the topic belongs to"},
                        "namespace": {"type": "string", "description": "Namespace; the server default when omitted"},
                        "partitions": {"type": "integer", "description": "Partition count", "default": 1},
                        "replicas": {"type": "integer", "description": "Replication factor", "default": 1},
                        "config": {"type": "object", "description": "Topic configuration, e.g. retention.ms"}
                    },
                    "required": ["name", "cluster"]
                }"#,
            )
    }

    #[instrument(skip(self, args), fields(tool = "create_topic"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let cluster = required(args, "cluster")?;
        let namespace = self.ctx.namespace(args);
        let partitions = positive_count(args, "partitions", 1)?;
        let replicas = positive_count(args, "replicas", 1)?;
        let config = args
            .map("config")
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect::<BTreeMap<_, _>>());

        let mut topic = KafkaTopic::new(
            &name,
            KafkaTopicSpec {
                partitions: Some(partitions),
                replicas: Some(replicas),
                config,
                ..Default::default()
            },
        );
        topic.metadata.labels = Some(labels::single(labels::CLUSTER, &cluster));

        self.ctx.repo::<KafkaTopic>().create(&namespace, &topic).await?;
        info!(topic = %name, namespace = %namespace, "Created topic");

        Ok(ToolResult::text(format!(
            "Created topic '{}' in namespace '{}' for cluster '{}' ({} partitions, {} replicas)",
            name, namespace, cluster, partitions, replicas
        )))
    }
}

/// Tool deleting a `KafkaTopic`.
pub struct DeleteTopicTool {
    ctx: ToolContext,
}

#[async_trait]
impl Tool for DeleteTopicTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("delete_topic", "Delete a KafkaTopic and the Kafka topic behind it")
            .with_category("topics")
            .with_schema(super::common::DESCRIBE_SCHEMA)
    }

    #[instrument(skip(self, args), fields(tool = "delete_topic"))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let namespace = self.ctx.namespace(args);
        let topics = self.ctx.repo::<KafkaTopic>();

        if !topics.exists(&namespace, &name).await? {
            return Ok(not_found("Topic", &name, &namespace));
        }
        topics.delete(&namespace, &name).await?;
        info!(topic = %name, namespace = %namespace, "Deleted topic");

        Ok(ToolResult::text(format!(
            "Deleted topic '{}' from namespace '{}'",
            name, namespace
        )))
    }
}

/// Topic tools.
pub struct TopicTools {
    ctx: ToolContext,
}

impl TopicTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for TopicTools {
    fn group(&self) -> &'static str {
        "topics"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(
                ListTool::<KafkaTopic>::new(
                    self.ctx.clone(),
                    "list_topics",
                    "List KafkaTopics with partitions, replicas and readiness",
                    "topics",
                    "topics",
                )
                .with_cluster_filter(),
            ),
            Arc::new(DescribeTool::<KafkaTopic>::new(
                self.ctx.clone(),
                "describe_topic",
                "Describe a KafkaTopic: configuration, topic ID and conditions",
                "topics",
                "Topic",
            )),
            Arc::new(CreateTopicTool {
                ctx: self.ctx.clone(),
            }),
            Arc::new(DeleteTopicTool {
                ctx: self.ctx.clone(),
            }),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strimzi_resources::MemoryStore;

    fn ctx() -> ToolContext {
        ToolContext::new(Arc::new(MemoryStore::new()), "kafka")
    }

    #[tokio::test]
    async fn test_create_topic_defaults() {
        let ctx = ctx();
        let tool = CreateTopicTool { ctx: ctx.clone() };

        let result = tool
            .call(&CallArguments::from(json!({
                "name": "orders",
                "cluster": "my-cluster",
                "config": {"retention.ms": 604800000}
            })))
            .await;
        assert!(!result.is_error, "{}", result.joined_text());

        let topic = ctx
            .repo::<KafkaTopic>()
            .get("kafka", "orders")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(topic.spec.partitions, Some(1));
        assert_eq!(topic.spec.replicas, Some(1));
        assert_eq!(topic.spec.config.as_ref().unwrap()["retention.ms"], 604800000);
        assert_eq!(cluster_of(&topic), "my-cluster");
    }

    #[tokio::test]
    async fn test_create_topic_requires_cluster() {
        let tool = CreateTopicTool { ctx: ctx() };
        let result = tool
            .call(&CallArguments::from(json!({"name": "orders"})))
            .await;
        assert!(result.is_error);
        assert!(result.joined_text().contains("cluster"));
    }

    #[tokio::test]
    async fn test_create_topic_rejects_bad_counts() {
        let ctx = ctx();
        let tool = CreateTopicTool { ctx: ctx.clone() };

        for (key, value) in [
            ("partitions", json!(4294967297i64)),
            ("partitions", json!(0)),
            ("replicas", json!(-1)),
        ] {
            let mut args = json!({"name": "orders", "cluster": "my-cluster"});
            args[key] = value;
            let result = tool.call(&CallArguments::from(args)).await;
            assert!(result.is_error, "{} accepted", key);
            assert!(result.joined_text().contains("must be between 1 and"));
        }

        assert!(!ctx.repo::<KafkaTopic>().exists("kafka", "orders").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_duplicate_topic_is_error_result() {
        let tool = CreateTopicTool { ctx: ctx() };
        let args = CallArguments::from(json!({"name": "orders", "cluster": "my-cluster"}));
        assert!(!tool.call(&args).await.is_error);

        let again = tool.call(&args).await;
        assert!(again.is_error);
        assert!(again.joined_text().contains("already exists"));
    }

    #[tokio::test]
    async fn test_delete_missing_topic() {
        let tool = DeleteTopicTool { ctx: ctx() };
        let result = tool
            .call(&CallArguments::from(json!({"name": "ghost"})))
            .await;
        assert!(result.is_error);
        assert_eq!(
            result.joined_text(),
            "Topic 'ghost' not found in namespace 'kafka'"
        );
    }
}
