//! Generic typed repository over the resource store.
//!
//! One implementation serves every resource kind. The kind is fixed at
//! compile time by the type parameter; its API coordinates come from
//! `kube::Resource` so no per-kind code is needed.

use crate::error::StoreResult;
use crate::store::{LabelFilter, ResourceStore};
use async_trait::async_trait;
use kube::api::ApiResource;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Bounds every kind accessed through a repository satisfies.
///
/// Implemented automatically for Strimzi custom resources and the
/// `k8s-openapi` core types.
pub trait ResourceKind:
    Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<K> ResourceKind for K where
    K: Resource<DynamicType = ()> + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Typed CRUD and filtered listing for one resource kind.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Single resource type.
    type Item: Send;
    /// List-of-resource type.
    type List: Send;

    /// List resources.
    ///
    /// An empty or missing namespace lists across all namespaces. The label
    /// filter applies only when both key and value are non-empty.
    async fn list(
        &self,
        namespace: Option<&str>,
        label_key: Option<&str>,
        label_value: Option<&str>,
    ) -> StoreResult<Self::List>;

    /// Fetch a resource, `None` if it does not exist.
    async fn get(&self, namespace: &str, name: &str) -> StoreResult<Option<Self::Item>>;

    /// Create a resource in the namespace.
    async fn create(&self, namespace: &str, object: &Self::Item) -> StoreResult<Self::Item>;

    /// Delete a resource.
    async fn delete(&self, namespace: &str, name: &str) -> StoreResult<()>;

    /// Whether the resource exists. Always answered through [`Repository::get`].
    async fn exists(&self, namespace: &str, name: &str) -> StoreResult<bool> {
        Ok(self.get(namespace, name).await?.is_some())
    }
}

/// Items returned by a list call.
#[derive(Debug, Clone)]
pub struct ResourceList<K> {
    pub items: Vec<K>,
}

impl<K> ResourceList<K> {
    pub fn new(items: Vec<K>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.items.iter()
    }
}

impl<K> Default for ResourceList<K> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<K> IntoIterator for ResourceList<K> {
    type Item = K;
    type IntoIter = std::vec::IntoIter<K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, K> IntoIterator for &'a ResourceList<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Repository for kind `K` backed by a shared store handle.
///
/// Stateless apart from the store handle; cheap to clone and share.
pub struct ResourceRepository<K> {
    store: Arc<dyn ResourceStore>,
    api_resource: ApiResource,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> ResourceRepository<K> {
    /// Create a repository for `K` on the given store.
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self {
            store,
            api_resource: ApiResource::erase::<K>(&()),
            _kind: PhantomData,
        }
    }

    /// API coordinates of the kind.
    pub fn api_resource(&self) -> &ApiResource {
        &self.api_resource
    }

    fn decode(value: serde_json::Value) -> StoreResult<K> {
        Ok(serde_json::from_value(value)?)
    }
}

impl<K> Clone for ResourceRepository<K> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            api_resource: self.api_resource.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for ResourceRepository<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRepository")
            .field("kind", &self.api_resource.kind)
            .field("api_version", &self.api_resource.api_version)
            .finish()
    }
}

#[async_trait]
impl<K: ResourceKind> Repository for ResourceRepository<K> {
    type Item = K;
    type List = ResourceList<K>;

    #[instrument(skip(self), fields(kind = %self.api_resource.kind))]
    async fn list(
        &self,
        namespace: Option<&str>,
        label_key: Option<&str>,
        label_value: Option<&str>,
    ) -> StoreResult<ResourceList<K>> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let label = LabelFilter::from_parts(label_key, label_value);

        let objects = self
            .store
            .list(&self.api_resource, namespace, label.as_ref())
            .await?;
        debug!(count = objects.len(), "Listed resources");

        let items = objects
            .into_iter()
            .map(Self::decode)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(ResourceList::new(items))
    }

    #[instrument(skip(self), fields(kind = %self.api_resource.kind))]
    async fn get(&self, namespace: &str, name: &str) -> StoreResult<Option<K>> {
        self.store
            .get(&self.api_resource, namespace, name)
            .await?
            .map(Self::decode)
            .transpose()
    }

    #[instrument(skip(self, object), fields(kind = %self.api_resource.kind))]
    async fn create(&self, namespace: &str, object: &K) -> StoreResult<K> {
        let value = serde_json::to_value(object)?;
        let created = self.store.create(&self.api_resource, namespace, value).await?;
        Self::decode(created)
    }

    #[instrument(skip(self), fields(kind = %self.api_resource.kind))]
    async fn delete(&self, namespace: &str, name: &str) -> StoreResult<()> {
        self.store.delete(&self.api_resource, namespace, name).await
    }
}
