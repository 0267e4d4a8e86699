//! Main controller implementation.
//!
//! Wires the Kubernetes client, the store, the reconciler, and the two
//! watch loops together. The watchers run as background tasks; `run()`
//! returns when the first of them exits, which only happens on failure.

use std::sync::Arc;

use kube::{Api, Client};
use tokio::task::JoinHandle;
use tracing::info;

use crds::{Inventory, Workflow};

use crate::error::ControllerError;
use crate::reconciler::Reconciler;
use crate::store::KubeStore;
use crate::watcher::Watcher;

/// Main controller for node provisioning.
pub struct Controller {
    inventory_watcher: JoinHandle<Result<(), ControllerError>>,
    workflow_watcher: JoinHandle<Result<(), ControllerError>>,
}

impl Controller {
    /// Creates a new controller instance.
    pub async fn new(namespace: Option<String>) -> Result<Self, ControllerError> {
        info!("Initializing Provisioning Controller");

        let kube_client = Client::try_default().await.map_err(ControllerError::Kube)?;

        let ns = namespace.as_deref().unwrap_or("default");
        let inventory_api: Api<Inventory> = Api::namespaced(kube_client.clone(), ns);
        let workflow_api: Api<Workflow> = Api::namespaced(kube_client.clone(), ns);

        let reconciler = Arc::new(Reconciler::new(KubeStore::new(kube_client)));

        let watcher_instance = Arc::new(Watcher::new(
            reconciler,
            inventory_api,
            workflow_api,
        ));

        let inventory_watcher = {
            let watcher = watcher_instance.clone();
            tokio::spawn(async move { watcher.watch_inventories().await })
        };

        let workflow_watcher = {
            let watcher = watcher_instance;
            tokio::spawn(async move { watcher.watch_workflows().await })
        };

        Ok(Self {
            inventory_watcher,
            workflow_watcher,
        })
    }

    /// Runs the controller until shutdown.
    pub async fn run(mut self) -> Result<(), ControllerError> {
        info!("Provisioning Controller running");

        // Both watchers should run forever; the first to exit ends the
        // process.
        tokio::select! {
            result = &mut self.inventory_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("Inventory watcher panicked: {}", e)))?
                    .map_err(|e| ControllerError::Watch(format!("Inventory watcher error: {}", e)))?;
            }
            result = &mut self.workflow_watcher => {
                result.map_err(|e| ControllerError::Watch(format!("Workflow watcher panicked: {}", e)))?
                    .map_err(|e| ControllerError::Watch(format!("Workflow watcher error: {}", e)))?;
            }
        }

        Ok(())
    }
}
