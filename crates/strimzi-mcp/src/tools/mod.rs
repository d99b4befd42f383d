//! Strimzi MCP tools
//!
//! Tools are grouped by resource family. Each group is a [`ToolFactory`]
//! built on a shared [`ToolContext`]; [`all_factories`] lists them in the
//! order they are announced to clients.

pub mod bridges;
pub mod clusters;
pub mod common;
pub mod connect;
pub mod health;
pub mod nodepools;
pub mod rebalance;
pub mod topics;
pub mod users;

pub use bridges::BridgeTools;
pub use clusters::ClusterTools;
pub use common::{DescribeTool, ListTool, Summarize};
pub use connect::ConnectTools;
pub use health::{HealthCheckTool, HealthTools};
pub use nodepools::NodePoolTools;
pub use rebalance::RebalanceTools;
pub use topics::TopicTools;
pub use users::UserTools;

use crate::args::CallArguments;
use crate::registry::{RegistryError, ToolFactory, ToolRegistry};
use crate::server::Tool;
use std::sync::Arc;
use strimzi_resources::{ResourceKind, ResourceRepository, ResourceStore};

/// Shared state handed to every tool.
#[derive(Clone)]
pub struct ToolContext {
    store: Arc<dyn ResourceStore>,
    default_namespace: String,
}

impl ToolContext {
    pub fn new(store: Arc<dyn ResourceStore>, default_namespace: impl Into<String>) -> Self {
        Self {
            store,
            default_namespace: default_namespace.into(),
        }
    }

    pub fn store(&self) -> Arc<dyn ResourceStore> {
        Arc::clone(&self.store)
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    /// The `namespace` argument, or the configured default.
    pub fn namespace(&self, args: &CallArguments) -> String {
        args.non_empty_string("namespace")
            .unwrap_or_else(|| self.default_namespace.clone())
    }

    /// Repository for kind `K`.
    pub fn repo<K: ResourceKind>(&self) -> ResourceRepository<K> {
        ResourceRepository::new(self.store())
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("default_namespace", &self.default_namespace)
            .finish()
    }
}

/// Every tool group, in announcement order.
pub fn all_factories(ctx: &ToolContext) -> Vec<Box<dyn ToolFactory>> {
    vec![
        Box::new(ClusterTools::new(ctx.clone())),
        Box::new(NodePoolTools::new(ctx.clone())),
        Box::new(TopicTools::new(ctx.clone())),
        Box::new(UserTools::new(ctx.clone())),
        Box::new(ConnectTools::new(ctx.clone())),
        Box::new(BridgeTools::new(ctx.clone())),
        Box::new(RebalanceTools::new(ctx.clone())),
        Box::new(HealthTools::new(ctx.clone())),
    ]
}

/// Get all available MCP tools, flattened.
pub fn all_tools(ctx: &ToolContext) -> Vec<Arc<dyn Tool>> {
    all_factories(ctx)
        .iter()
        .flat_map(|factory| factory.tools())
        .collect()
}

/// Build the registry served by the binary.
pub fn registry(ctx: &ToolContext) -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::from_factories(&all_factories(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strimzi_resources::MemoryStore;

    fn ctx() -> ToolContext {
        ToolContext::new(Arc::new(MemoryStore::new()), "kafka")
    }

    #[test]
    fn test_all_tools_count() {
        let tools = all_tools(&ctx());
        // 5 clusters + 2 node pools + 4 topics + 5 users + 6 connect
        // + 4 bridges/mirroring + 3 rebalance + 1 health
        assert_eq!(tools.len(), 30, "Expected 30 total tools");
    }

    #[test]
    fn test_all_tools_unique_names() {
        let tools = all_tools(&ctx());
        let mut names = std::collections::HashSet::new();

        for tool in tools {
            let def = tool.definition();
            assert!(
                names.insert(def.name.clone()),
                "Duplicate tool name: {}",
                def.name
            );
        }
    }

    #[test]
    fn test_every_schema_parses() {
        let registry = registry(&ctx()).unwrap();
        assert_eq!(registry.len(), 30);
        for descriptor in registry.descriptors() {
            assert_eq!(descriptor.input_schema.schema_type(), "object");
            for required in descriptor.input_schema.required() {
                assert!(
                    descriptor.input_schema.property(required).is_some(),
                    "{} requires undeclared property {}",
                    descriptor.name,
                    required
                );
            }
        }
    }

    #[test]
    fn test_group_sizes() {
        let ctx = ctx();
        let sizes: Vec<(&str, usize)> = all_factories(&ctx)
            .iter()
            .map(|f| (f.group(), f.tools().len()))
            .collect();
        assert_eq!(
            sizes,
            vec![
                ("clusters", 5),
                ("nodepools", 2),
                ("topics", 4),
                ("users", 5),
                ("connect", 6),
                ("bridges", 4),
                ("rebalance", 3),
                ("health", 1),
            ]
        );
    }

    #[test]
    fn test_namespace_defaults() {
        let ctx = ctx();
        let args = CallArguments::from(serde_json::json!({"namespace": ""}));
        assert_eq!(ctx.namespace(&args), "kafka");
        let args = CallArguments::from(serde_json::json!({"namespace": "streaming"}));
        assert_eq!(ctx.namespace(&args), "streaming");
    }
}
