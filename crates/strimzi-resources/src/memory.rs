//! In-memory resource store.
//!
//! Mirrors the semantics of the Kubernetes store closely enough to exercise
//! repositories, tools and health checkers without a cluster: duplicate
//! creates conflict, deletes of missing objects fail, label filters are exact
//! matches and an all-namespace list is the union of every namespace.

use crate::error::{StoreError, StoreResult};
use crate::store::{LabelFilter, ResourceStore};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use kube::api::ApiResource;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ObjectKey {
    group: String,
    kind: String,
    namespace: String,
    name: String,
}

impl ObjectKey {
    fn new(kind: &ApiResource, namespace: &str, name: &str) -> Self {
        Self {
            group: kind.group.clone(),
            kind: kind.kind.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    fn is_kind(&self, kind: &ApiResource) -> bool {
        self.group == kind.group && self.kind == kind.kind
    }
}

/// Resource store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<BTreeMap<ObjectKey, Value>>,
    failures: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for `kind` fail with [`StoreError::Unavailable`].
    pub async fn fail_kind(&self, kind: &str, message: impl Into<String>) {
        self.failures
            .write()
            .await
            .insert(kind.to_string(), message.into());
    }

    /// Remove an injected failure.
    pub async fn clear_failure(&self, kind: &str) {
        self.failures.write().await.remove(kind);
    }

    /// Number of stored objects across all kinds.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    async fn check_failure(&self, kind: &ApiResource) -> StoreResult<()> {
        match self.failures.read().await.get(&kind.kind) {
            Some(message) => Err(StoreError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

/// Fill in the fields the API server would set on create.
fn admit(kind: &ApiResource, namespace: &str, object: &mut Value) -> StoreResult<String> {
    let root = object
        .as_object_mut()
        .ok_or_else(|| StoreError::Invalid("object must be a JSON map".to_string()))?;

    root.entry("apiVersion")
        .or_insert_with(|| Value::String(kind.api_version.clone()));
    root.entry("kind")
        .or_insert_with(|| Value::String(kind.kind.clone()));

    let metadata = root
        .entry("metadata")
        .or_insert_with(|| Value::Object(Default::default()))
        .as_object_mut()
        .ok_or_else(|| StoreError::Invalid("metadata must be a JSON map".to_string()))?;

    let name = metadata
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StoreError::Invalid("metadata.name is required".to_string()))?;

    metadata.insert("namespace".to_string(), Value::String(namespace.to_string()));
    metadata.entry("creationTimestamp").or_insert_with(|| {
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    });

    Ok(name)
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list(
        &self,
        kind: &ApiResource,
        namespace: Option<&str>,
        label: Option<&LabelFilter>,
    ) -> StoreResult<Vec<Value>> {
        self.check_failure(kind).await?;

        let objects = self.objects.read().await;
        Ok(objects
            .iter()
            .filter(|(key, _)| key.is_kind(kind))
            .filter(|(key, _)| namespace.map_or(true, |ns| key.namespace == ns))
            .filter(|(_, obj)| label.map_or(true, |f| f.matches(obj)))
            .map(|(_, obj)| obj.clone())
            .collect())
    }

    async fn get(
        &self,
        kind: &ApiResource,
        namespace: &str,
        name: &str,
    ) -> StoreResult<Option<Value>> {
        self.check_failure(kind).await?;

        let key = ObjectKey::new(kind, namespace, name);
        Ok(self.objects.read().await.get(&key).cloned())
    }

    async fn create(
        &self,
        kind: &ApiResource,
        namespace: &str,
        mut object: Value,
    ) -> StoreResult<Value> {
        self.check_failure(kind).await?;

        let name = admit(kind, namespace, &mut object)?;
        let key = ObjectKey::new(kind, namespace, &name);

        let mut objects = self.objects.write().await;
        if objects.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: kind.kind.clone(),
                namespace: namespace.to_string(),
                name,
            });
        }
        objects.insert(key, object.clone());
        Ok(object)
    }

    async fn delete(&self, kind: &ApiResource, namespace: &str, name: &str) -> StoreResult<()> {
        self.check_failure(kind).await?;

        let key = ObjectKey::new(kind, namespace, name);
        match self.objects.write().await.remove(&key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                kind: kind.kind.clone(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
        }
    }
}
