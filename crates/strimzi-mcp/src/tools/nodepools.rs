//! Node pool tools

use super::common::{
    age, cluster_of, conditions_json, metadata_json, DescribeTool, ListTool, Summarize,
};
use super::ToolContext;
use crate::registry::ToolFactory;
use crate::server::Tool;
use kube::ResourceExt;
use serde_json::{json, Value};
use std::sync::Arc;
use strimzi_resources::{HasConditions, KafkaNodePool};

impl Summarize for KafkaNodePool {
    fn summary_line(&self) -> String {
        format!(
            "{} (cluster: {}, replicas: {}, roles: {}, status: {}, age: {})",
            self.name_any(),
            cluster_of(self),
            self.spec.replicas,
            self.spec.roles.join("+"),
            self.readiness().label(),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "cluster": cluster_of(self),
            "replicas": self.spec.replicas,
            "roles": self.spec.roles,
            "storage": self.spec.storage,
            "status": {
                "ready": self.is_ready(),
                "nodeIds": status.map(|s| s.node_ids.clone()).unwrap_or_default(),
                "replicas": status.and_then(|s| s.replicas),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

/// Node pool tools.
pub struct NodePoolTools {
    ctx: ToolContext,
}

impl NodePoolTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for NodePoolTools {
    fn group(&self) -> &'static str {
        "nodepools"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(
                ListTool::<KafkaNodePool>::new(
                    self.ctx.clone(),
                    "list_node_pools",
                    "List KafkaNodePools with roles and replica counts",
                    "nodepools",
                    "node pools",
                )
                .with_cluster_filter(),
            ),
            Arc::new(DescribeTool::<KafkaNodePool>::new(
                self.ctx.clone(),
                "describe_node_pool",
                "Describe a KafkaNodePool: roles, node IDs, storage and conditions",
                "nodepools",
                "Node pool",
            )),
        ]
    }
}
