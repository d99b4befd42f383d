//! Integration tests for the health check pipeline.
//!
//! Each test seeds an in-memory resource store with a small Strimzi
//! deployment and runs the standard pipeline against it.

use k8s_openapi::api::core::v1::PodStatus;
use std::collections::BTreeMap;
use std::sync::Arc;
use strimzi_mcp::tools::{self, ToolContext};
use strimzi_mcp::{CallArguments, HealthCheckContext, HealthCheckPipeline};
use strimzi_resources::{
    labels, Condition, Kafka, KafkaClusterSpec, KafkaSpec, KafkaStatus, KafkaTopic,
    KafkaTopicSpec, MemoryStore, Pod, Repository, ResourceRepository, ResourceStore,
};

/// Test fixture holding a seeded store.
struct Fixture {
    memory: Arc<MemoryStore>,
    store: Arc<dyn ResourceStore>,
}

impl Fixture {
    fn new() -> Self {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn ResourceStore> = memory.clone();
        Self { memory, store }
    }

    async fn kafka(&self, name: &str, replicas: i32, ready: bool) {
        let mut kafka = Kafka::new(
            name,
            KafkaSpec {
                kafka: KafkaClusterSpec {
                    replicas: Some(replicas),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        kafka.status = Some(KafkaStatus {
            conditions: vec![if ready {
                Condition::ready()
            } else {
                Condition::not_ready("Pods are not schedulable")
            }],
            ..Default::default()
        });
        ResourceRepository::<Kafka>::new(self.store.clone())
            .create("kafka", &kafka)
            .await
            .unwrap();
    }

    async fn broker_pod(&self, cluster: &str, index: usize, phase: &str) {
        let mut pod = Pod::default();
        pod.metadata.name = Some(format!("{}-kafka-{}", cluster, index));
        pod.metadata.labels = Some(BTreeMap::from([
            (labels::CLUSTER.to_string(), cluster.to_string()),
            (labels::NAME.to_string(), format!("{}-kafka", cluster)),
        ]));
        pod.status = Some(PodStatus {
            phase: Some(phase.to_string()),
            ..Default::default()
        });
        ResourceRepository::<Pod>::new(self.store.clone())
            .create("kafka", &pod)
            .await
            .unwrap();
    }

    async fn topic(&self, name: &str, cluster: &str) {
        let mut topic = KafkaTopic::new(name, KafkaTopicSpec::default());
        topic.metadata.labels = Some(labels::single(labels::CLUSTER, cluster));
        ResourceRepository::<KafkaTopic>::new(self.store.clone())
            .create("kafka", &topic)
            .await
            .unwrap();
    }

    fn context(&self) -> HealthCheckContext {
        HealthCheckContext::new(self.store.clone()).with_namespace("kafka")
    }
}

#[tokio::test]
async fn test_missing_broker_is_a_warning() {
    let fixture = Fixture::new();
    fixture.kafka("my-cluster", 3, true).await;
    fixture.broker_pod("my-cluster", 0, "Running").await;
    fixture.broker_pod("my-cluster", 1, "Running").await;
    fixture.broker_pod("my-cluster", 2, "Pending").await;

    let result = HealthCheckPipeline::standard().run(&fixture.context()).await;
    let report = result.format();

    assert!(report.contains("Found 1 Kafka cluster(s)"));
    assert!(report.contains("  ✓ my-cluster: Ready"));
    assert!(report.contains("Brokers: 2/3 running ⚠"));
    assert_eq!(result.warnings(), 1);
    assert_eq!(result.issues(), 0);
    assert!(report.contains("⚠ 1 warning(s) found"));
}

#[tokio::test]
async fn test_not_ready_cluster_is_an_issue() {
    let fixture = Fixture::new();
    fixture.kafka("my-cluster", 1, false).await;
    fixture.broker_pod("my-cluster", 0, "Running").await;

    let result = HealthCheckPipeline::standard().run(&fixture.context()).await;
    let report = result.format();

    assert!(report.contains("  ✗ my-cluster: NotReady - Pods are not schedulable"));
    assert!(report.contains("Brokers: 1/1 running"));
    assert_eq!(result.issues(), 1);
    assert!(report.contains("✗ 1 issue(s) found"));
}

#[tokio::test]
async fn test_format_is_idempotent() {
    let fixture = Fixture::new();
    fixture.kafka("my-cluster", 1, true).await;

    let result = HealthCheckPipeline::standard().run(&fixture.context()).await;
    let first = result.format();
    assert_eq!(first, result.format());
    assert_eq!(result.sections().len(), 8);
}

#[tokio::test]
async fn test_store_failure_does_not_stop_pipeline() {
    let fixture = Fixture::new();
    fixture.kafka("my-cluster", 1, true).await;
    fixture.broker_pod("my-cluster", 0, "Running").await;
    fixture.topic("orders", "my-cluster").await;
    fixture
        .memory
        .fail_kind("KafkaTopic", "connection refused")
        .await;

    let result = HealthCheckPipeline::standard().run(&fixture.context()).await;
    let report = result.format();

    assert!(report.contains("✗ Failed to check Topics"));
    assert!(report.contains("connection refused"));
    assert_eq!(result.issues(), 1);

    let sections = result.sections();
    assert!(sections.iter().any(|s| s == "Users"));
    assert!(sections.iter().any(|s| s == "MirrorMaker2"));
    assert!(report.find("Topics").unwrap() < report.find("Users").unwrap());
}

#[tokio::test]
async fn test_cluster_filter_applies_to_report() {
    let fixture = Fixture::new();
    fixture.kafka("my-cluster", 1, true).await;
    fixture.kafka("other", 1, false).await;
    fixture.broker_pod("my-cluster", 0, "Running").await;

    let ctx = fixture.context().with_cluster("my-cluster");
    let result = HealthCheckPipeline::standard().run(&ctx).await;
    let report = result.format();

    assert!(report.contains("Namespace: kafka | Cluster: my-cluster"));
    assert!(!report.contains("other"));
    assert!(result.is_healthy());
    assert!(report.contains("✓ All resources healthy"));
}

#[tokio::test]
async fn test_health_check_tool_reports_text() {
    let fixture = Fixture::new();
    fixture.kafka("my-cluster", 3, true).await;
    fixture.broker_pod("my-cluster", 0, "Running").await;

    let ctx = ToolContext::new(fixture.store.clone(), "kafka");
    let registry = tools::registry(&ctx).unwrap();
    let tool = registry.get("health_check").unwrap();

    let result = tool
        .call(&CallArguments::from(serde_json::json!({"cluster": "my-cluster"})))
        .await;

    assert!(!result.is_error);
    let text = result.joined_text();
    assert!(text.starts_with("=== Strimzi Kafka Health Check ==="));
    assert!(text.contains("Brokers: 1/3 running ⚠"));
}
