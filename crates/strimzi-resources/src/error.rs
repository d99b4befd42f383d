//! Resource store errors.

use thiserror::Error;

/// Errors raised while talking to the resource store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed object does not exist.
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        /// Resource kind.
        kind: String,
        /// Namespace of the object.
        namespace: String,
        /// Object name.
        name: String,
    },

    /// An object with the same namespace and name already exists.
    #[error("{kind} {namespace}/{name} already exists")]
    AlreadyExists {
        /// Resource kind.
        kind: String,
        /// Namespace of the object.
        namespace: String,
        /// Object name.
        name: String,
    },

    /// Kubernetes API call failed.
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// Object could not be converted to or from its typed form.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The object was rejected by the store.
    #[error("Invalid object: {0}")]
    Invalid(String),

    /// The store cannot serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether the error means the addressed object is missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            StoreError::NotFound { .. } => true,
            StoreError::Kube(kube::Error::Api(response)) => response.code == 404,
            _ => false,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
