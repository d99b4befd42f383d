//! `KafkaUser` resource.

use crate::condition::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaUser")]
#[kube(namespaced)]
#[kube(status = "KafkaUserStatus")]
#[kube(shortname = "ku")]
#[serde(rename_all = "camelCase")]
pub struct KafkaUserSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<KafkaUserAuthentication>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quotas: Option<Value>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
pub struct KafkaUserAuthentication {
    /// `tls`, `tls-external` or `scram-sha-512`.
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaUserStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,

    /// Principal name used by Kafka.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Secret holding the credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl KafkaUser {
    pub fn authentication_type(&self) -> Option<&str> {
        self.spec.authentication.as_ref().map(|a| a.type_.as_str())
    }
}
