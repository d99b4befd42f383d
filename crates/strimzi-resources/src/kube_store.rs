//! Kubernetes-backed resource store.

use crate::error::{StoreError, StoreResult};
use crate::store::{LabelFilter, ResourceStore};
use async_trait::async_trait;
use kube::api::{Api, ApiResource, DeleteParams, DynamicObject, ListParams, PostParams};
use kube::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Resource store that talks to a Kubernetes API server.
///
/// Timeouts and authentication come from the `kube::Client` configuration.
#[derive(Clone)]
pub struct KubeStore {
    client: Client,
}

impl KubeStore {
    /// Create a store on an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a store from the default kubeconfig or in-cluster config.
    pub async fn try_default() -> StoreResult<Self> {
        Ok(Self::new(Client::try_default().await?))
    }

    fn namespaced(&self, kind: &ApiResource, namespace: &str) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), namespace, kind)
    }
}

fn conflict(kind: &ApiResource, namespace: &str, name: &str) -> StoreError {
    StoreError::AlreadyExists {
        kind: kind.kind.clone(),
        namespace: namespace.to_string(),
        name: name.to_string(),
    }
}

fn missing(kind: &ApiResource, namespace: &str, name: &str) -> StoreError {
    StoreError::NotFound {
        kind: kind.kind.clone(),
        namespace: namespace.to_string(),
        name: name.to_string(),
    }
}

#[async_trait]
impl ResourceStore for KubeStore {
    #[instrument(skip(self, kind), fields(kind = %kind.kind))]
    async fn list(
        &self,
        kind: &ApiResource,
        namespace: Option<&str>,
        label: Option<&LabelFilter>,
    ) -> StoreResult<Vec<Value>> {
        let api: Api<DynamicObject> = match namespace {
            Some(ns) => self.namespaced(kind, ns),
            None => Api::all_with(self.client.clone(), kind),
        };

        let mut params = ListParams::default();
        if let Some(filter) = label {
            params = params.labels(&filter.selector());
        }

        let list = api.list(&params).await?;
        debug!(count = list.items.len(), "Listed objects");

        list.items
            .into_iter()
            .map(|obj| serde_json::to_value(obj).map_err(StoreError::from))
            .collect()
    }

    #[instrument(skip(self, kind), fields(kind = %kind.kind))]
    async fn get(
        &self,
        kind: &ApiResource,
        namespace: &str,
        name: &str,
    ) -> StoreResult<Option<Value>> {
        match self.namespaced(kind, namespace).get_opt(name).await? {
            Some(obj) => Ok(Some(serde_json::to_value(obj)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, kind, object), fields(kind = %kind.kind))]
    async fn create(&self, kind: &ApiResource, namespace: &str, object: Value) -> StoreResult<Value> {
        let mut object: DynamicObject = serde_json::from_value(object)?;
        object.metadata.namespace = Some(namespace.to_string());
        let name = object.metadata.name.clone().unwrap_or_default();

        match self
            .namespaced(kind, namespace)
            .create(&PostParams::default(), &object)
            .await
        {
            Ok(created) => Ok(serde_json::to_value(created)?),
            Err(kube::Error::Api(ae)) if ae.code == 409 => {
                warn!(name = %name, "Object already exists");
                Err(conflict(kind, namespace, &name))
            }
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, kind), fields(kind = %kind.kind))]
    async fn delete(&self, kind: &ApiResource, namespace: &str, name: &str) -> StoreResult<()> {
        match self
            .namespaced(kind, namespace)
            .delete(name, &DeleteParams::default())
            .await
        {
            Ok(_) => Ok(()),
            Err(kube::Error::Api(ae)) if ae.code == 404 => Err(missing(kind, namespace, name)),
            Err(e) => Err(e.into()),
        }
    }
}
