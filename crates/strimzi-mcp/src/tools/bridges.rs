//! Bridge and mirroring tools

use super::common::{age, conditions_json, metadata_json, DescribeTool, ListTool, Summarize};
use super::ToolContext;
use crate::registry::ToolFactory;
use crate::server::Tool;
use kube::ResourceExt;
use serde_json::{json, Value};
use std::sync::Arc;
use strimzi_resources::{HasConditions, KafkaBridge, KafkaMirrorMaker2};

impl Summarize for KafkaBridge {
    fn summary_line(&self) -> String {
        format!(
            "{} (replicas: {}, bootstrap: {}, url: {}, status: {}, age: {})",
            self.name_any(),
            self.spec.replicas.unwrap_or(1),
            self.spec.bootstrap_servers,
            self.status
                .as_ref()
                .and_then(|s| s.url.as_deref())
                .unwrap_or("-"),
            self.readiness().label(),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "replicas": self.spec.replicas,
            "bootstrapServers": self.spec.bootstrap_servers,
            "httpPort": self.spec.http.as_ref().and_then(|h| h.port),
            "status": {
                "ready": self.is_ready(),
                "url": status.and_then(|s| s.url.clone()),
                "replicas": status.and_then(|s| s.replicas),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

impl Summarize for KafkaMirrorMaker2 {
    fn summary_line(&self) -> String {
        let flows: Vec<String> = self
            .spec
            .mirrors
            .iter()
            .map(|m| format!("{}->{}", m.source_cluster, m.target_cluster))
            .collect();
        format!(
            "{} (replicas: {}, connect cluster: {}, mirrors: {}, status: {}, age: {})",
            self.name_any(),
            self.spec.replicas.unwrap_or(1),
            self.spec.connect_cluster,
            if flows.is_empty() {
                "-".to_string()
            } else {
                flows.join(", ")
            },
            self.readiness().label(),
            age(&self.metadata)
        )
    }

    fn details(&self) -> Value {
        let status = self.status.as_ref();
        json!({
            "metadata": metadata_json(self),
            "replicas": self.spec.replicas,
            "version": self.spec.version,
            "connectCluster": self.spec.connect_cluster,
            "clusters": self.spec.clusters.iter().map(|c| json!({
                "alias": c.alias,
                "bootstrapServers": c.bootstrap_servers,
            })).collect::<Vec<_>>(),
            "mirrors": self.spec.mirrors.iter().map(|m| json!({
                "source": m.source_cluster,
                "target": m.target_cluster,
                "topicsPattern": m.topics_pattern,
                "groupsPattern": m.groups_pattern,
            })).collect::<Vec<_>>(),
            "status": {
                "ready": self.is_ready(),
                "url": status.and_then(|s| s.url.clone()),
                "connectors": status.map(|s| s.connectors.clone()).unwrap_or_default(),
                "conditions": conditions_json(self.conditions()),
            },
        })
    }
}

/// Bridge and MirrorMaker2 tools.
pub struct BridgeTools {
    ctx: ToolContext,
}

impl BridgeTools {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

impl ToolFactory for BridgeTools {
    fn group(&self) -> &'static str {
        "bridges"
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        vec![
            Arc::new(ListTool::<KafkaBridge>::new(
                self.ctx.clone(),
                "list_kafka_bridges",
                "List KafkaBridges with HTTP URL and readiness",
                "bridges",
                "Kafka bridges",
            )),
            Arc::new(DescribeTool::<KafkaBridge>::new(
                self.ctx.clone(),
                "describe_kafka_bridge",
                "Describe a KafkaBridge: bootstrap servers, HTTP port and conditions",
                "bridges",
                "Kafka bridge",
            )),
            Arc::new(ListTool::<KafkaMirrorMaker2>::new(
                self.ctx.clone(),
                "list_mirror_makers",
                "List KafkaMirrorMaker2 deployments with their mirroring flows",
                "bridges",
                "MirrorMaker2 deployments",
            )),
            Arc::new(DescribeTool::<KafkaMirrorMaker2>::new(
                self.ctx.clone(),
                "describe_mirror_maker",
                "Describe a KafkaMirrorMaker2: clusters, mirrors and connector status",
                "bridges",
                "MirrorMaker2",
            )),
        ]
    }
}
