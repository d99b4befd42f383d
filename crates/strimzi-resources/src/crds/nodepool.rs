//! `KafkaNodePool` resource.

use crate::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role a node pool's nodes take in the cluster.
pub const ROLE_BROKER: &str = "broker";
pub const ROLE_CONTROLLER: &str = "controller";

/// A group of Kafka nodes sharing configuration.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaNodePool")]
#[kube(namespaced)]
#[kube(status = "KafkaNodePoolStatus")]
#[kube(shortname = "knp")]
#[serde(rename_all = "camelCase")]
pub struct KafkaNodePoolSpec {
    pub replicas: i32,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaNodePoolStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default)]
    pub node_ids: Vec<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
}

impl KafkaNodePool {
    pub fn has_role(&self, role: &str) -> bool {
        self.spec.roles.iter().any(|r| r == role)
    }
}
