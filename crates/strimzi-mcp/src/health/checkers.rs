//! Checkers for each Strimzi resource family.

use super::{HealthCheckContext, HealthCheckResult, HealthChecker};
use async_trait::async_trait;
use kube::ResourceExt;
use std::marker::PhantomData;
use strimzi_resources::{
    labels, HasConditions, Kafka, KafkaBridge, KafkaConnect, KafkaConnector, KafkaMirrorMaker2,
    KafkaNodePool, KafkaTopic, KafkaUser, Pod, Readiness, Repository, ResourceKind,
    StoreResult, ROLE_BROKER,
};
use tracing::{debug, warn};

/// Replica count Strimzi assumes for Connect clusters without `spec.replicas`.
const DEFAULT_CONNECT_REPLICAS: i32 = 3;

/// How a checker classifies an unhealthy item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Issue,
    Warning,
}

impl Severity {
    pub fn marker(self) -> &'static str {
        match self {
            Severity::Issue => "✗",
            Severity::Warning => "⚠",
        }
    }
}

/// The checkers of a full health check, in report order.
pub fn standard() -> Vec<Box<dyn HealthChecker>> {
    vec![
        Box::new(KafkaClusterChecker),
        Box::new(
            ReadinessChecker::<KafkaNodePool>::new("Node Pools", "node pools", Severity::Warning)
                .cluster_scoped(),
        ),
        Box::new(
            ReadinessChecker::<KafkaTopic>::new("Topics", "topics", Severity::Issue)
                .cluster_scoped(),
        ),
        Box::new(
            ReadinessChecker::<KafkaUser>::new("Users", "users", Severity::Issue).cluster_scoped(),
        ),
        Box::new(ConnectChecker),
        Box::new(ConnectorChecker),
        Box::new(ReadinessChecker::<KafkaBridge>::new(
            "Kafka Bridges",
            "bridges",
            Severity::Issue,
        )),
        Box::new(ReadinessChecker::<KafkaMirrorMaker2>::new(
            "MirrorMaker2",
            "mirror makers",
            Severity::Issue,
        )),
    ]
}

/// Name shown in findings; qualified with the namespace when the run spans
/// every namespace.
fn display_name<K: ResourceKind>(ctx: &HealthCheckContext, resource: &K) -> String {
    match (ctx.namespace(), resource.namespace()) {
        (None, Some(ns)) => format!("{}/{}", ns, resource.name_any()),
        _ => resource.name_any(),
    }
}

fn not_ready_text(readiness: &Readiness) -> String {
    match readiness.message() {
        Some(message) => format!("NotReady - {}", message),
        None => "NotReady".to_string(),
    }
}

fn is_running(pod: &Pod) -> bool {
    pod.status.as_ref().and_then(|s| s.phase.as_deref()) == Some("Running")
}

/// Readiness of every item of one kind.
pub struct ReadinessChecker<K> {
    title: &'static str,
    noun: &'static str,
    severity: Severity,
    cluster_scoped: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K> ReadinessChecker<K> {
    pub fn new(title: &'static str, noun: &'static str, severity: Severity) -> Self {
        Self {
            title,
            noun,
            severity,
            cluster_scoped: false,
            _kind: PhantomData,
        }
    }

    /// Apply the context's cluster filter through the `strimzi.io/cluster`
    /// label.
    pub fn cluster_scoped(mut self) -> Self {
        self.cluster_scoped = true;
        self
    }
}

#[async_trait]
impl<K: ResourceKind + HasConditions> HealthChecker for ReadinessChecker<K> {
    fn title(&self) -> &str {
        self.title
    }

    async fn inspect(
        &self,
        ctx: &HealthCheckContext,
        result: &mut HealthCheckResult,
    ) -> StoreResult<()> {
        let items = if self.cluster_scoped {
            ctx.list_in_cluster::<K>().await?
        } else {
            ctx.list::<K>().await?
        };

        if items.is_empty() {
            result.line(format!("No {} found", self.noun));
            return Ok(());
        }

        let ready = items.iter().filter(|i| i.is_ready()).count();
        result.line(format!("{}/{} {} ready", ready, items.len(), self.noun));

        for item in items.iter() {
            let readiness = item.readiness();
            if readiness.is_ready() {
                continue;
            }
            result.record(
                self.severity,
                format!(
                    "  {} {}: {}",
                    self.severity.marker(),
                    display_name(ctx, item),
                    not_ready_text(&readiness)
                ),
            );
        }
        Ok(())
    }
}

/// Kafka cluster readiness plus running broker pods.
///
/// Not-ready clusters are issues; fewer running brokers than desired is a
/// warning.
pub struct KafkaClusterChecker;

impl KafkaClusterChecker {
    /// Desired brokers: `spec.kafka.replicas`, else the sum of the cluster's
    /// broker node pools.
    async fn desired_brokers(ctx: &HealthCheckContext, kafka: &Kafka, ns: &str) -> StoreResult<i32> {
        if let Some(replicas) = kafka.declared_replicas() {
            return Ok(replicas);
        }
        let pools = ctx
            .repo::<KafkaNodePool>()
            .list(Some(ns), Some(labels::CLUSTER), Some(kafka.name_any().as_str()))
            .await?;
        Ok(pools
            .iter()
            .filter(|p| p.has_role(ROLE_BROKER))
            .map(|p| p.spec.replicas)
            .sum())
    }

    /// Desired and running broker counts for one cluster.
    async fn broker_counts(
        ctx: &HealthCheckContext,
        kafka: &Kafka,
        ns: &str,
    ) -> StoreResult<(i32, i32)> {
        let desired = Self::desired_brokers(ctx, kafka, ns).await?;
        let running = Self::running_brokers(ctx, &kafka.name_any(), ns).await?;
        Ok((desired, running))
    }

    async fn running_brokers(ctx: &HealthCheckContext, cluster: &str, ns: &str) -> StoreResult<i32> {
        let pods = ctx
            .repo::<Pod>()
            .list(Some(ns), Some(labels::CLUSTER), Some(cluster))
            .await?;
        let running = pods
            .iter()
            .filter(|pod| labels::is_broker_pod(pod.metadata.labels.as_ref(), cluster))
            .filter(|pod| is_running(pod))
            .count();
        Ok(running as i32)
    }
}

#[async_trait]
impl HealthChecker for KafkaClusterChecker {
    fn title(&self) -> &str {
        "Kafka Clusters"
    }

    async fn inspect(
        &self,
        ctx: &HealthCheckContext,
        result: &mut HealthCheckResult,
    ) -> StoreResult<()> {
        let clusters: Vec<Kafka> = ctx
            .list::<Kafka>()
            .await?
            .into_iter()
            .filter(|k| ctx.cluster().map_or(true, |c| k.name_any() == c))
            .collect();

        if clusters.is_empty() {
            result.line("No Kafka clusters found");
            return Ok(());
        }
        result.line(format!("Found {} Kafka cluster(s)", clusters.len()));

        for kafka in &clusters {
            let name = display_name(ctx, kafka);
            let readiness = kafka.readiness();
            if readiness.is_ready() {
                result.line(format!("  ✓ {}: Ready", name));
            } else {
                result.issue(format!("  ✗ {}: {}", name, not_ready_text(&readiness)));
            }

            let ns = kafka.namespace().unwrap_or_default();
            let (desired, running) = match Self::broker_counts(ctx, kafka, &ns).await {
                Ok(counts) => counts,
                Err(e) => {
                    warn!(cluster = %name, error = %e, "Failed to count brokers");
                    result.issue(format!("  ✗ {}: failed to count brokers: {}", name, e));
                    continue;
                }
            };
            debug!(cluster = %name, desired, running, "Broker pods counted");

            if running < desired {
                result.warning(format!("  Brokers: {}/{} running ⚠", running, desired));
            } else {
                result.line(format!("  Brokers: {}/{} running", running, desired));
            }
        }
        Ok(())
    }
}

/// Kafka Connect readiness plus running worker pods.
pub struct ConnectChecker;

#[async_trait]
impl HealthChecker for ConnectChecker {
    fn title(&self) -> &str {
        "Kafka Connect"
    }

    async fn inspect(
        &self,
        ctx: &HealthCheckContext,
        result: &mut HealthCheckResult,
    ) -> StoreResult<()> {
        let connects = ctx.list::<KafkaConnect>().await?;
        if connects.is_empty() {
            result.line("No Kafka Connect clusters found");
            return Ok(());
        }

        let ready = connects.iter().filter(|c| c.is_ready()).count();
        result.line(format!("{}/{} Connect clusters ready", ready, connects.len()));

        for connect in &connects {
            let name = display_name(ctx, connect);
            let readiness = connect.readiness();
            if !readiness.is_ready() {
                result.issue(format!("  ✗ {}: {}", name, not_ready_text(&readiness)));
            }

            let ns = connect.namespace().unwrap_or_default();
            let pods = match ctx
                .repo::<Pod>()
                .list(Some(ns.as_str()), Some(labels::CLUSTER), Some(connect.name_any().as_str()))
                .await
            {
                Ok(pods) => pods,
                Err(e) => {
                    warn!(connect = %name, error = %e, "Failed to count workers");
                    result.issue(format!("  ✗ {}: failed to count workers: {}", name, e));
                    continue;
                }
            };
            let running = pods
                .iter()
                .filter(|p| labels::has_label(p.metadata.labels.as_ref(), labels::KIND, "KafkaConnect"))
                .filter(|p| is_running(p))
                .count() as i32;
            let desired = connect.spec.replicas.unwrap_or(DEFAULT_CONNECT_REPLICAS);

            if running < desired {
                result.warning(format!("  ⚠ {}: {}/{} pods running", name, running, desired));
            }
        }
        Ok(())
    }
}

/// Connector state as reported by Connect.
///
/// `FAILED` or not ready is an issue; `PAUSED`, `STOPPED` or failed tasks is a
/// warning.
pub struct ConnectorChecker;

#[async_trait]
impl HealthChecker for ConnectorChecker {
    fn title(&self) -> &str {
        "Connectors"
    }

    async fn inspect(
        &self,
        ctx: &HealthCheckContext,
        result: &mut HealthCheckResult,
    ) -> StoreResult<()> {
        let connectors = ctx.list::<KafkaConnector>().await?;
        if connectors.is_empty() {
            result.line("No connectors found");
            return Ok(());
        }

        let running = connectors
            .iter()
            .filter(|c| c.connector_state() == Some("RUNNING"))
            .count();
        result.line(format!("{}/{} connectors running", running, connectors.len()));

        for connector in &connectors {
            let name = display_name(ctx, connector);
            let readiness = connector.readiness();
            let failed_tasks = connector.failed_tasks();

            match connector.connector_state() {
                Some("FAILED") => result.issue(format!("  ✗ {}: FAILED", name)),
                _ if !readiness.is_ready() => {
                    result.issue(format!("  ✗ {}: {}", name, not_ready_text(&readiness)))
                }
                Some(state @ ("PAUSED" | "STOPPED")) => {
                    result.warning(format!("  ⚠ {}: {}", name, state))
                }
                _ if failed_tasks > 0 => {
                    result.warning(format!("  ⚠ {}: {} failed task(s)", name, failed_tasks))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use strimzi_resources::{
        Condition, KafkaClusterSpec, KafkaConnectSpec, KafkaConnectStatus, KafkaConnectorSpec,
        KafkaConnectorStatus, KafkaSpec, KafkaStatus, KafkaTopicSpec, KafkaTopicStatus,
        MemoryStore, ResourceRepository, ResourceStore,
    };

    async fn topic(store: &Arc<dyn ResourceStore>, name: &str, cluster: &str, ready: bool) {
        let mut topic = KafkaTopic::new(name, KafkaTopicSpec::default());
        topic.metadata.labels = Some(labels::single(labels::CLUSTER, cluster));
        topic.status = Some(KafkaTopicStatus {
            conditions: vec![if ready {
                Condition::ready()
            } else {
                Condition::not_ready("Invalid replication factor")
            }],
            ..Default::default()
        });
        strimzi_resources::ResourceRepository::<KafkaTopic>::new(store.clone())
            .create("kafka", &topic)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_readiness_checker_counts_and_flags() {
        let store: Arc<dyn ResourceStore> = Arc::new(MemoryStore::new());
        topic(&store, "orders", "my-cluster", true).await;
        topic(&store, "payments", "my-cluster", false).await;
        topic(&store, "audit", "other-cluster", false).await;

        let ctx = HealthCheckContext::new(store)
            .with_namespace("kafka")
            .with_cluster("my-cluster");
        let checker =
            ReadinessChecker::<KafkaTopic>::new("Topics", "topics", Severity::Issue).cluster_scoped();

        let mut result = HealthCheckResult::new();
        checker.inspect(&ctx, &mut result).await.unwrap();

        let report = result.format();
        assert!(report.contains("1/2 topics ready"));
        assert!(report.contains("  ✗ payments: NotReady - Invalid replication factor"));
        assert!(!report.contains("audit"));
        assert_eq!(result.issues(), 1);
        assert_eq!(result.warnings(), 0);
    }

    #[tokio::test]
    async fn test_readiness_checker_empty() {
        let ctx = HealthCheckContext::new(Arc::new(MemoryStore::new()));
        let checker = ReadinessChecker::<KafkaUser>::new("Users", "users", Severity::Issue);

        let mut result = HealthCheckResult::new();
        checker.inspect(&ctx, &mut result).await.unwrap();
        assert!(result.format().contains("No users found"));
        assert!(result.is_healthy());
    }

    #[tokio::test]
    async fn test_connector_states() {
        let store: Arc<dyn ResourceStore> = Arc::new(MemoryStore::new());
        let repo = strimzi_resources::ResourceRepository::<KafkaConnector>::new(store.clone());

        for (name, state) in [("sink", "RUNNING"), ("source", "FAILED"), ("mirror", "PAUSED")] {
            let mut connector = KafkaConnector::new(name, KafkaConnectorSpec::default());
            connector.status = Some(KafkaConnectorStatus {
                conditions: vec![Condition::ready()],
                connector_status: Some(json!({"connector": {"state": state}, "tasks": []})),
                ..Default::default()
            });
            repo.create("kafka", &connector).await.unwrap();
        }

        let ctx = HealthCheckContext::new(store).with_namespace("kafka");
        let mut result = HealthCheckResult::new();
        ConnectorChecker.inspect(&ctx, &mut result).await.unwrap();

        let report = result.format();
        assert!(report.contains("1/3 connectors running"));
        assert!(report.contains("  ✗ source: FAILED"));
        assert!(report.contains("  ⚠ mirror: PAUSED"));
        assert_eq!(result.issues(), 1);
        assert_eq!(result.warnings(), 1);
    }

    async fn kafka(store: &Arc<dyn ResourceStore>, name: &str, ready: bool) {
        let mut kafka = Kafka::new(
            name,
            KafkaSpec {
                kafka: KafkaClusterSpec {
                    replicas: Some(1),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        kafka.status = Some(KafkaStatus {
            conditions: vec![if ready {
                Condition::ready()
            } else {
                Condition::not_ready("Broker storage is full")
            }],
            ..Default::default()
        });
        ResourceRepository::<Kafka>::new(store.clone())
            .create("kafka", &kafka)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_pod_failure_keeps_checking_clusters() {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn ResourceStore> = memory.clone();
        kafka(&store, "a-cluster", true).await;
        kafka(&store, "b-cluster", false).await;
        memory.fail_kind("Pod", "pods is forbidden").await;

        let ctx = HealthCheckContext::new(store).with_namespace("kafka");
        let mut result = HealthCheckResult::new();
        KafkaClusterChecker.check(&ctx, &mut result).await;

        let report = result.format();
        assert!(report.contains("  ✓ a-cluster: Ready"));
        assert!(report.contains("  ✗ a-cluster: failed to count brokers: Store unavailable: pods is forbidden"));
        assert!(report.contains("  ✗ b-cluster: NotReady - Broker storage is full"));
        assert!(report.contains("  ✗ b-cluster: failed to count brokers"));
        assert!(!report.contains("Failed to check Kafka Clusters"));
        assert_eq!(result.issues(), 3);
        assert_eq!(result.warnings(), 0);
    }

    #[tokio::test]
    async fn test_pod_failure_keeps_checking_connects() {
        let memory = Arc::new(MemoryStore::new());
        let store: Arc<dyn ResourceStore> = memory.clone();
        let repo = ResourceRepository::<KafkaConnect>::new(store.clone());
        for (name, ready) in [("a-connect", true), ("b-connect", false)] {
            let mut connect = KafkaConnect::new(name, KafkaConnectSpec::default());
            connect.status = Some(KafkaConnectStatus {
                conditions: vec![if ready {
                    Condition::ready()
                } else {
                    Condition::not_ready("Plugin download failed")
                }],
                ..Default::default()
            });
            repo.create("kafka", &connect).await.unwrap();
        }
        memory.fail_kind("Pod", "pods is forbidden").await;

        let ctx = HealthCheckContext::new(store).with_namespace("kafka");
        let mut result = HealthCheckResult::new();
        ConnectChecker.check(&ctx, &mut result).await;

        let report = result.format();
        assert!(report.contains("  ✗ a-connect: failed to count workers"));
        assert!(report.contains("  ✗ b-connect: NotReady - Plugin download failed"));
        assert!(report.contains("  ✗ b-connect: failed to count workers"));
        assert_eq!(result.issues(), 3);
    }

    #[test]
    fn test_standard_order() {
        let titles: Vec<String> = standard().iter().map(|c| c.title().to_string()).collect();
        assert_eq!(
            titles,
            [
                "Kafka Clusters",
                "Node Pools",
                "Topics",
                "Users",
                "Kafka Connect",
                "Connectors",
                "Kafka Bridges",
                "MirrorMaker2"
            ]
        );
    }
}
