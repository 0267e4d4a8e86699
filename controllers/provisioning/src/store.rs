//! Resource store abstraction.
//!
//! The reconcilers only ever need a narrow get/create/update/event surface
//! over the cluster state, so that surface is a trait: `KubeStore`
//! implements it over `kube::Api`, and unit tests substitute an in-memory
//! store. Concurrency safety is delegated to the API server's
//! resource-version semantics; a conflicting hardware update surfaces as an
//! error and the whole reconcile is retried with fresh reads.

use async_trait::async_trait;
use thiserror::Error;

use kube::api::{Api, PostParams};
use kube::runtime::events::{Event, EventType, Recorder, Reporter};
use kube::{Client, Resource, ResourceExt};

use crds::{Cluster, Hardware, Inventory, Workflow};

/// Reporter name attached to published events.
const REPORTER: &str = "provisioning-controller";

/// Severity of a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSeverity {
    /// Informational
    Normal,
    /// Something needs operator attention
    Warning,
}

/// Errors surfaced by a resource store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Kubernetes API failure (including update conflicts)
    #[error("kubernetes api: {0}")]
    Kube(#[from] kube::Error),

    /// Store-specific failure (used by test doubles)
    #[error("{0}")]
    Other(String),
}

/// Narrow store surface consumed by the reconcilers.
///
/// Get operations return `Ok(None)` for not-found so callers can decide
/// which absences are benign; every other failure is an `Err`.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch an Inventory by namespace/name.
    async fn get_inventory(&self, namespace: &str, name: &str)
        -> Result<Option<Inventory>, StoreError>;

    /// Fetch a Cluster by namespace/name.
    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Option<Cluster>, StoreError>;

    /// Fetch a Hardware record by namespace/name.
    async fn get_hardware(&self, namespace: &str, name: &str)
        -> Result<Option<Hardware>, StoreError>;

    /// Fetch a Workflow by namespace/name.
    async fn get_workflow(&self, namespace: &str, name: &str)
        -> Result<Option<Workflow>, StoreError>;

    /// Create a Hardware record.
    async fn create_hardware(&self, hardware: &Hardware) -> Result<(), StoreError>;

    /// Create a Workflow.
    async fn create_workflow(&self, workflow: &Workflow) -> Result<(), StoreError>;

    /// Replace a Hardware record, conditional on the resource version it
    /// carries.
    async fn update_hardware(&self, hardware: &Hardware) -> Result<(), StoreError>;

    /// Publish an event against a Cluster.
    async fn publish_cluster_event(
        &self,
        cluster: &Cluster,
        severity: EventSeverity,
        reason: &str,
        note: String,
    ) -> Result<(), StoreError>;
}

/// Production store over the Kubernetes API.
pub struct KubeStore {
    client: Client,
    recorder: Recorder,
}

impl KubeStore {
    /// Wrap a Kubernetes client.
    pub fn new(client: Client) -> Self {
        let reporter = Reporter {
            controller: REPORTER.into(),
            instance: None,
        };
        let recorder = Recorder::new(client.clone(), reporter);
        Self { client, recorder }
    }
}

#[async_trait]
impl ResourceStore for KubeStore {
    async fn get_inventory(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Inventory>, StoreError> {
        let api: Api<Inventory> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Option<Cluster>, StoreError> {
        let api: Api<Cluster> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn get_hardware(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Hardware>, StoreError> {
        let api: Api<Hardware> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn get_workflow(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Workflow>, StoreError> {
        let api: Api<Workflow> = Api::namespaced(self.client.clone(), namespace);
        Ok(api.get_opt(name).await?)
    }

    async fn create_hardware(&self, hardware: &Hardware) -> Result<(), StoreError> {
        let namespace = hardware.namespace().unwrap_or_default();
        let api: Api<Hardware> = Api::namespaced(self.client.clone(), &namespace);
        api.create(&PostParams::default(), hardware).await?;
        Ok(())
    }

    async fn create_workflow(&self, workflow: &Workflow) -> Result<(), StoreError> {
        let namespace = workflow.namespace().unwrap_or_default();
        let api: Api<Workflow> = Api::namespaced(self.client.clone(), &namespace);
        api.create(&PostParams::default(), workflow).await?;
        Ok(())
    }

    async fn update_hardware(&self, hardware: &Hardware) -> Result<(), StoreError> {
        let namespace = hardware.namespace().unwrap_or_default();
        let name = hardware.name_any();
        let api: Api<Hardware> = Api::namespaced(self.client.clone(), &namespace);
        api.replace(&name, &PostParams::default(), hardware).await?;
        Ok(())
    }

    async fn publish_cluster_event(
        &self,
        cluster: &Cluster,
        severity: EventSeverity,
        reason: &str,
        note: String,
    ) -> Result<(), StoreError> {
        let event = Event {
            type_: match severity {
                EventSeverity::Normal => EventType::Normal,
                EventSeverity::Warning => EventType::Warning,
            },
            reason: reason.to_string(),
            note: Some(note),
            action: "Reconcile".to_string(),
            secondary: None,
        };
        self.recorder.publish(&event, &cluster.object_ref(&())).await?;
        Ok(())
    }
}
