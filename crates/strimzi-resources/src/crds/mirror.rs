//! `KafkaMirrorMaker2` resource.

use crate::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cross-cluster replication through MirrorMaker 2.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaMirrorMaker2")]
#[kube(namespaced)]
#[kube(status = "KafkaMirrorMaker2Status")]
#[kube(shortname = "kmm2")]
#[serde(rename_all = "camelCase")]
pub struct KafkaMirrorMaker2Spec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Alias of the cluster the Connect workers run against.
    pub connect_cluster: String,

    #[serde(default)]
    pub clusters: Vec<MirrorMaker2ClusterSpec>,

    #[serde(default)]
    pub mirrors: Vec<MirrorMaker2MirrorSpec>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MirrorMaker2ClusterSpec {
    pub alias: String,
    pub bootstrap_servers: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MirrorMaker2MirrorSpec {
    pub source_cluster: String,
    pub target_cluster: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topics_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups_pattern: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaMirrorMaker2Status {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(default)]
    pub connectors: Vec<Value>,
}
