//! # Strimzi Resources
//!
//! This crate provides the resource-access layer for the Strimzi MCP server:
//! the Strimzi custom resource types, the readiness rule derived from status
//! conditions, and a single generic repository that gives every resource kind
//! the same CRUD and filtered-listing semantics.
//!
//! ## Overview
//!
//! - **Resources**: `Kafka`, `KafkaNodePool`, `KafkaTopic`, `KafkaUser`,
//!   `KafkaConnect`, `KafkaConnector`, `KafkaBridge`, `KafkaMirrorMaker2` and
//!   `KafkaRebalance`, plus the core Kubernetes kinds from `k8s-openapi`
//! - **Conditions**: `Condition` and the `Ready`/`NotReady` rule
//! - **Store**: the `ResourceStore` capability (list/get/create/delete by kind)
//! - **Repository**: `ResourceRepository<K>`, one implementation for all kinds
//!
//! ## Architecture
//!
//! ```text
//! Tool / HealthChecker
//!        │  typed K
//!        ▼
//! ResourceRepository<K>  ──  ApiResource::erase::<K>()
//!        │  serde_json::Value
//!        ▼
//! ResourceStore (KubeStore | MemoryStore)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use strimzi_resources::{KafkaTopic, MemoryStore, Repository, ResourceRepository};
//!
//! async fn topics() -> Result<(), strimzi_resources::StoreError> {
//!     let store = Arc::new(MemoryStore::new());
//!     let topics = ResourceRepository::<KafkaTopic>::new(store);
//!
//!     let listed = topics
//!         .list(Some("kafka"), Some("strimzi.io/cluster"), Some("my-cluster"))
//!         .await?;
//!     println!("{} topics", listed.len());
//!     Ok(())
//! }
//! ```

pub mod condition;
pub mod crds;
pub mod error;
pub mod kube_store;
pub mod labels;
#[cfg(feature = "memory")]
pub mod memory;
pub mod repository;
pub mod store;

pub use condition::{readiness, Condition, ConditionStatus, HasConditions, Readiness};
pub use crds::*;
pub use error::{StoreError, StoreResult};
pub use kube_store::KubeStore;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;
pub use repository::{Repository, ResourceKind, ResourceList, ResourceRepository};
pub use store::{LabelFilter, ResourceStore};

// Core Kubernetes kinds accessed through the same repository.
pub use k8s_openapi::api::core::v1::{PersistentVolumeClaim, Pod, Secret, Service};
