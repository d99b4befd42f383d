//! Strimzi custom resource definitions (`kafka.strimzi.io/v1beta2`).
//!
//! Only the fields the tools and health checks read are modeled; free-form
//! sections (storage, authorization, rack awareness...) are kept as raw JSON
//! so objects round-trip through the store without loss of the parts we use.

pub mod bridge;
pub mod connect;
pub mod kafka;
pub mod mirror;
pub mod nodepool;
pub mod rebalance;
pub mod topic;
pub mod user;

pub use bridge::*;
pub use connect::*;
pub use kafka::*;
pub use mirror::*;
pub use nodepool::*;
pub use rebalance::*;
pub use topic::*;
pub use user::*;

use crate::condition::{Condition, HasConditions};

/// API group of every Strimzi resource.
pub const STRIMZI_GROUP: &str = "kafka.strimzi.io";

macro_rules! impl_has_conditions {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl HasConditions for $kind {
                fn conditions(&self) -> Option<&[Condition]> {
                    self.status.as_ref().map(|s| s.conditions.as_slice())
                }
            }
        )+
    };
}

impl_has_conditions!(
    Kafka,
    KafkaNodePool,
    KafkaTopic,
    KafkaUser,
    KafkaConnect,
    KafkaConnector,
    KafkaBridge,
    KafkaMirrorMaker2,
    KafkaRebalance,
);
