//! `Kafka` cluster resource.

use crate::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Desired state of a Kafka cluster.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "Kafka")]
#[kube(namespaced)]
#[kube(status = "KafkaStatus")]
#[kube(shortname = "k")]
#[serde(rename_all = "camelCase")]
pub struct KafkaSpec {
    /// Broker configuration.
    pub kafka: KafkaClusterSpec,

    /// ZooKeeper ensemble (absent on KRaft clusters).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zookeeper: Option<ZookeeperClusterSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_operator: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cruise_control: Option<Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaClusterSpec {
    /// Kafka version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Broker count. Absent when brokers come from node pools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(default)]
    pub listeners: Vec<GenericListener>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZookeeperClusterSpec {
    pub replicas: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Value>,
}

/// Listener exposed by the brokers.
#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenericListener {
    pub name: String,
    pub port: i32,
    /// `internal`, `route`, `loadbalancer`, `nodeport`, `ingress`, `cluster-ip`.
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub tls: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Value>,
}

/// Observed state of a Kafka cluster.
#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    #[serde(default)]
    pub listeners: Vec<ListenerStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kafka_version: Option<String>,

    /// `ZooKeeper`, `KRaft`, or one of the migration states.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kafka_metadata_state: Option<String>,

    #[serde(default)]
    pub kafka_node_pools: Vec<UsedNodePoolStatus>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListenerStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_servers: Option<String>,

    #[serde(default)]
    pub addresses: Vec<ListenerAddress>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
pub struct ListenerAddress {
    pub host: String,
    pub port: i32,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
pub struct UsedNodePoolStatus {
    pub name: String,
}

impl Kafka {
    /// Broker count declared on the `Kafka` resource itself.
    pub fn declared_replicas(&self) -> Option<i32> {
        self.spec.kafka.replicas
    }

    /// Whether the cluster runs in KRaft mode.
    pub fn is_kraft(&self) -> bool {
        self.spec.zookeeper.is_none()
    }

    /// Listener statuses, empty without a status block.
    pub fn listener_statuses(&self) -> &[ListenerStatus] {
        self.status
            .as_ref()
            .map(|s| s.listeners.as_slice())
            .unwrap_or_default()
    }
}
