//! Controller-specific error types.
//!
//! Every error surfaced from a reconcile pass is transient: the watcher's
//! error policy requeues and the next pass re-reads fresh state. Benign
//! not-found cases (workflow gone, no owning cluster) never become errors.

use thiserror::Error;

use kube::Error as KubeError;

use crate::store::StoreError;

/// Errors that can occur in the Provisioning Controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Resource store error
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Descriptor generation failed
    #[error("descriptor generation failed: {0}")]
    Generate(#[from] tink::GenerateError),

    /// Hardware backing a workflow is not visible yet; retried until it is.
    /// This deliberately covers genuine deletion too.
    #[error("hardware for workflow {0} not available")]
    HardwareUnavailable(String),

    /// Cluster referenced by an allocated inventory is not visible yet
    #[error("cluster {0} referenced by inventory {1} not available")]
    ClusterUnavailable(String, String),

    /// Owner-cluster lookup failed for a reason other than not-found
    #[error("fetching owner cluster for workflow {0}: {1}")]
    OwnerLookup(String, #[source] StoreError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}
