//! Building blocks shared by the resource tools.
//!
//! Most list and describe tools differ only in the kind they read and how an
//! item is rendered, so they are one generic [`ListTool`] and one generic
//! [`DescribeTool`] parameterized by a [`Summarize`] kind.

use super::ToolContext;
use crate::args::CallArguments;
use crate::server::{McpServerError, McpServerResult, Tool};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;
use serde_json::{json, Value};
use std::marker::PhantomData;
use strimzi_resources::{labels, Condition, Repository, ResourceKind};
use tracing::{debug, instrument};

pub const LIST_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "namespace": {"type": "string", "description": "Namespace to list; all namespaces when omitted"}
    }
}"#;

pub const CLUSTER_LIST_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "namespace": {"type": "string", "description": "Namespace to list; all namespaces when omitted"},
        "cluster": {"type": "string", "description": "Only resources labelled strimzi.io/cluster=<cluster>"}
    }
}"#;

pub const DESCRIBE_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "name": {"type": "string", "description": "Resource name"},
        "namespace": {"type": "string", "description": "Namespace; the server default when omitted"}
    },
    "required": ["name"]
}"#;

/// Rendering of one resource kind in tool output.
pub trait Summarize {
    /// One line in a list result.
    fn summary_line(&self) -> String;

    /// Structured view returned by describe.
    fn details(&self) -> Value;
}

/// Required string argument.
pub fn required(args: &CallArguments, key: &str) -> McpServerResult<String> {
    args.non_empty_string(key)
        .ok_or_else(|| McpServerError::missing(key))
}

/// Count argument such as a partition or replica count: `default` when
/// missing, otherwise an integer in `1..=i32::MAX`.
pub fn positive_count(args: &CallArguments, key: &str, default: i32) -> McpServerResult<i32> {
    let value = args.int_or(key, i64::from(default));
    match i32::try_from(value) {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(McpServerError::InvalidParams(format!(
            "'{}' must be between 1 and {}, got {}",
            key,
            i32::MAX,
            value
        ))),
    }
}

/// Compact age of a resource, e.g. `3d`, `5h`, `12m`.
pub fn age(meta: &ObjectMeta) -> String {
    meta.creation_timestamp
        .as_ref()
        .map(|t| format_age(t.0, Utc::now()))
        .unwrap_or_else(|| "-".to_string())
}

fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created);
    if elapsed.num_days() > 0 {
        format!("{}d", elapsed.num_days())
    } else if elapsed.num_hours() > 0 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_minutes() > 0 {
        format!("{}m", elapsed.num_minutes())
    } else {
        format!("{}s", elapsed.num_seconds().max(0))
    }
}

/// Conditions as JSON for describe output.
pub fn conditions_json(conditions: Option<&[Condition]>) -> Value {
    serde_json::to_value(conditions.unwrap_or_default()).unwrap_or(Value::Null)
}

/// Name, namespace, labels and age shared by every describe result.
pub fn metadata_json<K: ResourceKind>(resource: &K) -> Value {
    json!({
        "name": resource.name_any(),
        "namespace": resource.namespace(),
        "labels": resource.labels(),
        "age": age(resource.meta()),
    })
}

/// Cluster a resource is labelled with, `-` when unlabelled.
pub fn cluster_of<K: ResourceKind>(resource: &K) -> String {
    resource
        .labels()
        .get(labels::CLUSTER)
        .cloned()
        .unwrap_or_else(|| "-".to_string())
}

/// Error result for a missing resource.
pub fn not_found(noun: &str, name: &str, namespace: &str) -> ToolResult {
    ToolResult::error(format!(
        "{} '{}' not found in namespace '{}'",
        noun, name, namespace
    ))
}

/// Lists one kind, optionally filtered by namespace and cluster label.
pub struct ListTool<K> {
    ctx: ToolContext,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    noun: &'static str,
    cluster_label: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K> ListTool<K> {
    pub fn new(
        ctx: ToolContext,
        name: &'static str,
        description: &'static str,
        category: &'static str,
        noun: &'static str,
    ) -> Self {
        Self {
            ctx,
            name,
            description,
            category,
            noun,
            cluster_label: false,
            _kind: PhantomData,
        }
    }

    /// Accept a `cluster` argument matched against `strimzi.io/cluster`.
    pub fn with_cluster_filter(mut self) -> Self {
        self.cluster_label = true;
        self
    }
}

#[async_trait]
impl<K: ResourceKind + Summarize> Tool for ListTool<K> {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name, self.description)
            .with_category(self.category)
            .with_schema(if self.cluster_label {
                CLUSTER_LIST_SCHEMA
            } else {
                LIST_SCHEMA
            })
    }

    #[instrument(skip(self, args), fields(tool = self.name))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let namespace = args.non_empty_string("namespace");
        let cluster = if self.cluster_label {
            args.non_empty_string("cluster")
        } else {
            None
        };

        let items = self
            .ctx
            .repo::<K>()
            .list(namespace.as_deref(), Some(labels::CLUSTER), cluster.as_deref())
            .await?;
        debug!(count = items.len(), "Listed {}", self.noun);

        let scope = match &namespace {
            Some(ns) => format!("namespace '{}'", ns),
            None => "all namespaces".to_string(),
        };
        if items.is_empty() {
            return Ok(ToolResult::text(format!("No {} found in {}", self.noun, scope)));
        }

        let mut lines = vec![format!("Found {} {} in {}:", items.len(), self.noun, scope)];
        lines.extend(items.iter().map(|item| format!("- {}", item.summary_line())));
        Ok(ToolResult::text(lines.join("\n")))
    }
}

/// Describes one named resource of a kind.
pub struct DescribeTool<K> {
    ctx: ToolContext,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    noun: &'static str,
    _kind: PhantomData<fn() -> K>,
}

impl<K> DescribeTool<K> {
    pub fn new(
        ctx: ToolContext,
        name: &'static str,
        description: &'static str,
        category: &'static str,
        noun: &'static str,
    ) -> Self {
        Self {
            ctx,
            name,
            description,
            category,
            noun,
            _kind: PhantomData,
        }
    }
}

#[async_trait]
impl<K: ResourceKind + Summarize> Tool for DescribeTool<K> {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name, self.description)
            .with_category(self.category)
            .with_schema(DESCRIBE_SCHEMA)
    }

    #[instrument(skip(self, args), fields(tool = self.name))]
    async fn execute(&self, args: &CallArguments) -> McpServerResult<ToolResult> {
        let name = required(args, "name")?;
        let namespace = self.ctx.namespace(args);

        match self.ctx.repo::<K>().get(&namespace, &name).await? {
            Some(resource) => Ok(ToolResult::json(resource.details())),
            None => Ok(not_found(self.noun, &name, &namespace)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_age() {
        let now = Utc::now();
        assert_eq!(format_age(now - Duration::days(3), now), "3d");
        assert_eq!(format_age(now - Duration::hours(5), now), "5h");
        assert_eq!(format_age(now - Duration::minutes(12), now), "12m");
        assert_eq!(format_age(now - Duration::seconds(7), now), "7s");
        assert_eq!(format_age(now + Duration::seconds(7), now), "0s");
    }

    #[test]
    fn test_age_without_timestamp() {
        assert_eq!(age(&ObjectMeta::default()), "-");
    }

    #[test]
    fn test_required_argument() {
        let args = CallArguments::from(json!({"name": "orders", "blank": ""}));
        assert_eq!(required(&args, "name").unwrap(), "orders");
        let err = required(&args, "blank").unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameters: Missing required argument: blank");
    }

    #[test]
    fn test_positive_count() {
        let args = CallArguments::from(json!({
            "partitions": 12,
            "huge": 4294967297i64,
            "zero": 0,
            "negative": -3
        }));
        assert_eq!(positive_count(&args, "partitions", 1).unwrap(), 12);
        assert_eq!(positive_count(&args, "replicas", 1).unwrap(), 1);

        let err = positive_count(&args, "huge", 1).unwrap_err();
        assert!(err.to_string().contains("'huge' must be between 1 and 2147483647, got 4294967297"));
        assert!(positive_count(&args, "zero", 1).is_err());
        assert!(positive_count(&args, "negative", 1).is_err());
    }
}
