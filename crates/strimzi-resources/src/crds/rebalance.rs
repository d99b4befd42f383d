//! `KafkaRebalance` resource.

use crate::condition::{Condition, ConditionStatus};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Condition types that describe the rebalance lifecycle.
pub const REBALANCE_STATES: &[&str] = &[
    "New",
    "PendingProposal",
    "ProposalReady",
    "Rebalancing",
    "Stopped",
    "NotReady",
    "Ready",
    "ReconciliationPaused",
];

/// A Cruise Control rebalance request.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[kube(group = "kafka.strimzi.io", version = "v1beta2", kind = "KafkaRebalance")]
#[kube(namespaced)]
#[kube(status = "KafkaRebalanceStatus")]
#[kube(shortname = "kr")]
#[serde(rename_all = "camelCase")]
pub struct KafkaRebalanceSpec {
    /// `full`, `add-brokers` or `remove-brokers`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brokers: Vec<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_hard_goal_check: Option<bool>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct KafkaRebalanceStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization_result: Option<BTreeMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl KafkaRebalance {
    /// Current lifecycle state: the rebalance state condition that is `True`.
    pub fn state(&self) -> Option<&str> {
        self.status
            .as_ref()?
            .conditions
            .iter()
            .find(|c| c.status == ConditionStatus::True && REBALANCE_STATES.contains(&c.type_.as_str()))
            .map(|c| c.type_.as_str())
    }
}
