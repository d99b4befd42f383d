//! The resource store capability.
//!
//! A store knows nothing about typed resources: it moves JSON objects
//! addressed by an [`ApiResource`], a namespace and a name. Typed access is
//! layered on top by [`crate::ResourceRepository`].

use crate::error::StoreResult;
use async_trait::async_trait;
use kube::api::ApiResource;
use serde_json::Value;

/// Exact-match label filter (`key=value`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    pub key: String,
    pub value: String,
}

impl LabelFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a filter from optional parts.
    ///
    /// Returns `None` unless both key and value are present and non-empty,
    /// which means "no label filter".
    pub fn from_parts(key: Option<&str>, value: Option<&str>) -> Option<Self> {
        match (key, value) {
            (Some(k), Some(v)) if !k.is_empty() && !v.is_empty() => Some(Self::new(k, v)),
            _ => None,
        }
    }

    /// Render as a Kubernetes label selector.
    pub fn selector(&self) -> String {
        format!("{}={}", self.key, self.value)
    }

    /// Whether a JSON object's `metadata.labels` satisfy the filter.
    pub fn matches(&self, object: &Value) -> bool {
        object
            .pointer("/metadata/labels")
            .and_then(|labels| labels.get(&self.key))
            .and_then(Value::as_str)
            .is_some_and(|v| v == self.value)
    }
}

/// Capability to read and write objects of any kind in the remote store.
///
/// `namespace = None` on `list` means all namespaces.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// List objects of a kind, optionally scoped to a namespace and label.
    async fn list(
        &self,
        kind: &ApiResource,
        namespace: Option<&str>,
        label: Option<&LabelFilter>,
    ) -> StoreResult<Vec<Value>>;

    /// Fetch one object; `Ok(None)` when it does not exist.
    async fn get(&self, kind: &ApiResource, namespace: &str, name: &str)
        -> StoreResult<Option<Value>>;

    /// Create an object, failing if `(namespace, name)` is taken.
    async fn create(&self, kind: &ApiResource, namespace: &str, object: Value)
        -> StoreResult<Value>;

    /// Delete an object.
    async fn delete(&self, kind: &ApiResource, namespace: &str, name: &str) -> StoreResult<()>;
}
