//! `KafkaConnect` and `KafkaConnector` resources.

use crate::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A Kafka Connect cluster.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaConnect")]
#[kube(namespaced)]
#[kube(status = "KafkaConnectStatus")]
#[kube(shortname = "kc")]
#[serde(rename_all = "camelCase")]
pub struct KafkaConnectSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub bootstrap_servers: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, Value>>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaConnectStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default)]
    pub connector_plugins: Vec<ConnectorPlugin>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
pub struct ConnectorPlugin {
    pub class: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// A connector running on a Kafka Connect cluster.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaConnector")]
#[kube(namespaced)]
#[kube(status = "KafkaConnectorStatus")]
#[kube(shortname = "kctr")]
#[serde(rename_all = "camelCase")]
pub struct KafkaConnectorSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_max: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, Value>>,

    /// Desired state: `running`, `paused` or `stopped`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaConnectorStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Raw status reported by the Connect REST API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connector_status: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_max: Option<i32>,

    #[serde(default)]
    pub topics: Vec<String>,
}

impl KafkaConnector {
    /// Connector state reported by Connect (`RUNNING`, `PAUSED`, `FAILED`...).
    pub fn connector_state(&self) -> Option<&str> {
        self.status
            .as_ref()?
            .connector_status
            .as_ref()?
            .pointer("/connector/state")?
            .as_str()
    }

    /// Number of tasks in state `FAILED`.
    pub fn failed_tasks(&self) -> usize {
        self.status
            .as_ref()
            .and_then(|s| s.connector_status.as_ref())
            .and_then(|cs| cs.get("tasks"))
            .and_then(Value::as_array)
            .map(|tasks| {
                tasks
                    .iter()
                    .filter(|t| t.get("state").and_then(Value::as_str) == Some("FAILED"))
                    .count()
            })
            .unwrap_or(0)
    }
}
