//! Label keys the Strimzi operator puts on the resources it manages.

use std::collections::BTreeMap;

/// Name of the Kafka cluster a resource belongs to.
pub const CLUSTER: &str = "strimzi.io/cluster";

/// Kind of the custom resource that owns a managed object.
pub const KIND: &str = "strimzi.io/kind";

/// Name of the owning component (`<cluster>-kafka`, `<cluster>-connect`, ...).
pub const NAME: &str = "strimzi.io/name";

/// Node pool a broker/controller pod was created from.
pub const POOL_NAME: &str = "strimzi.io/pool-name";

/// Set to `"true"` on pods that act as brokers.
pub const BROKER_ROLE: &str = "strimzi.io/broker-role";

/// Set to `"true"` on pods that act as KRaft controllers.
pub const CONTROLLER_ROLE: &str = "strimzi.io/controller-role";

/// Whether a label map contains `key=value`.
pub fn has_label(labels: Option<&BTreeMap<String, String>>, key: &str, value: &str) -> bool {
    labels
        .and_then(|l| l.get(key))
        .is_some_and(|v| v == value)
}

/// Whether a pod's labels mark it as a broker of `cluster`.
///
/// KRaft brokers carry `strimzi.io/broker-role=true`; ZooKeeper-mode brokers
/// are named `<cluster>-kafka`.
pub fn is_broker_pod(labels: Option<&BTreeMap<String, String>>, cluster: &str) -> bool {
    has_label(labels, CLUSTER, cluster)
        && (has_label(labels, BROKER_ROLE, "true")
            || has_label(labels, NAME, &format!("{}-kafka", cluster)))
}

/// Build a single-entry label map.
pub fn single(key: &str, value: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(key.to_string(), value.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_label() {
        let labels = single(CLUSTER, "my-cluster");
        assert!(has_label(Some(&labels), CLUSTER, "my-cluster"));
        assert!(!has_label(Some(&labels), CLUSTER, "other"));
        assert!(!has_label(Some(&labels), KIND, "Kafka"));
        assert!(!has_label(None, CLUSTER, "my-cluster"));
    }

    #[test]
    fn test_is_broker_pod() {
        let mut kraft = single(CLUSTER, "my-cluster");
        kraft.insert(BROKER_ROLE.to_string(), "true".to_string());
        assert!(is_broker_pod(Some(&kraft), "my-cluster"));
        assert!(!is_broker_pod(Some(&kraft), "other"));

        let mut zk = single(CLUSTER, "my-cluster");
        zk.insert(NAME.to_string(), "my-cluster-kafka".to_string());
        assert!(is_broker_pod(Some(&zk), "my-cluster"));

        let mut controller = single(CLUSTER, "my-cluster");
        controller.insert(CONTROLLER_ROLE.to_string(), "true".to_string());
        assert!(!is_broker_pod(Some(&controller), "my-cluster"));
    }
}
