//! `KafkaTopic` resource.

use crate::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaTopic")]
#[kube(namespaced)]
#[kube(status = "KafkaTopicStatus")]
#[kube(shortname = "kt")]
#[serde(rename_all = "camelCase")]
pub struct KafkaTopicSpec {
    /// Topic name in Kafka when it differs from the resource name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, Value>>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaTopicStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
}
