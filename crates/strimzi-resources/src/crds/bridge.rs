//! `KafkaBridge` resource.

use crate::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// HTTP bridge to a Kafka cluster.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaBridge")]
#[kube(namespaced)]
#[kube(status = "KafkaBridgeStatus")]
#[kube(shortname = "kb")]
#[serde(rename_all = "camelCase")]
pub struct KafkaBridgeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    pub bootstrap_servers: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<KafkaBridgeHttpConfig>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
pub struct KafkaBridgeHttpConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaBridgeStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,
}
