//! Kubernetes resource watchers.
//!
//! Both watch loops run through a generic `watch_resource()` helper built on
//! kube_runtime::Controller, which handles reconnection, retry backoff, and
//! event batching. Reconcilers receive namespace/name pairs and re-read the
//! object from the store, so a stale watch event cannot act on old state.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use kube::{Api, ResourceExt};
use kube_runtime::{
    controller::{Action, Config as ControllerConfig},
    watcher, Controller,
};
use tracing::{debug, error, info};

use crds::{Inventory, Workflow};

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::store::KubeStore;

type SharedReconciler = Arc<Reconciler<KubeStore>>;

/// Generic watch loop over one resource kind.
///
/// The wrapped reconcile functions return `()` on success; every success maps
/// to `Action::await_change()` and every error to a fixed requeue, so the
/// loop never spins on a persistently broken object.
async fn watch_resource<K, F>(
    api: Api<K>,
    reconciler: SharedReconciler,
    reconcile_fn: F,
    resource_name: &str,
) -> Result<(), ControllerError>
where
    K: kube::Resource
        + Clone
        + Send
        + Sync
        + 'static
        + std::fmt::Debug
        + serde::de::DeserializeOwned,
    K::DynamicType: Default + std::cmp::Eq + std::hash::Hash + Clone + std::fmt::Debug + Unpin,
    F: Fn(
            SharedReconciler,
            Arc<K>,
        ) -> Pin<Box<dyn Future<Output = Result<Action, ControllerError>> + Send>>
        + Send
        + Sync
        + Clone
        + 'static,
{
    info!("Starting {} watcher", resource_name);

    let error_policy = |obj: Arc<K>, error: &ControllerError, _ctx: SharedReconciler| {
        error!(
            "Reconciliation error for {} {}: {}",
            resource_name,
            obj.name_any(),
            error
        );
        Action::requeue(Duration::from_secs(60))
    };

    let reconcile = move |obj: Arc<K>, ctx: SharedReconciler| {
        let reconcile_fn = reconcile_fn.clone();
        let resource_name = resource_name.to_string();
        async move {
            debug!("Reconciling {} {}", resource_name, obj.name_any());
            match reconcile_fn(ctx, obj).await {
                Ok(action) => Ok(action),
                Err(e) => {
                    error!("Reconciliation failed for {}: {}", resource_name, e);
                    Err(e)
                }
            }
        }
    };

    // Debounce batches the burst of status updates the provisioning engine
    // writes while a workflow runs.
    let controller_config = ControllerConfig::default()
        .debounce(Duration::from_secs(5))
        .concurrency(3);

    Controller::new(api, watcher::Config::default())
        .with_config(controller_config)
        .run(reconcile, error_policy, reconciler)
        .for_each(|res| async move {
            if let Err(e) = res {
                error!("Controller error for {}: {}", resource_name, e);
            }
        })
        .await;

    Ok(())
}

fn namespaced_key<K: kube::Resource>(resource: &K) -> (String, String) {
    (
        resource.meta().namespace.clone().unwrap_or_default(),
        resource.meta().name.clone().unwrap_or_default(),
    )
}

/// Watches Inventory and Workflow resources for changes.
pub struct Watcher {
    reconciler: SharedReconciler,
    inventory_api: Api<Inventory>,
    workflow_api: Api<Workflow>,
}

impl Watcher {
    /// Creates a new watcher instance.
    pub fn new(
        reconciler: SharedReconciler,
        inventory_api: Api<Inventory>,
        workflow_api: Api<Workflow>,
    ) -> Self {
        Self {
            reconciler,
            inventory_api,
            workflow_api,
        }
    }

    /// Starts watching Inventory resources.
    pub async fn watch_inventories(&self) -> Result<(), ControllerError> {
        watch_resource(
            self.inventory_api.clone(),
            self.reconciler.clone(),
            |reconciler, resource| {
                Box::pin(async move {
                    let (namespace, name) = namespaced_key(&*resource);
                    match reconciler.reconcile_inventory(&namespace, &name).await {
                        Ok(()) => Ok(Action::await_change()),
                        Err(e) => Err(e),
                    }
                })
            },
            "Inventory",
        )
        .await
    }

    /// Starts watching Workflow resources.
    pub async fn watch_workflows(&self) -> Result<(), ControllerError> {
        watch_resource(
            self.workflow_api.clone(),
            self.reconciler.clone(),
            |reconciler, resource| {
                Box::pin(async move {
                    let (namespace, name) = namespaced_key(&*resource);
                    match reconciler.reconcile_workflow(&namespace, &name).await {
                        Ok(()) => Ok(Action::await_change()),
                        Err(e) => Err(e),
                    }
                })
            },
            "Workflow",
        )
        .await
    }
}
