//! Inventory reconciler
//!
//! Seeds the provisioning engine's Hardware and Workflow descriptors for an
//! Inventory once address allocation has bound it to a Cluster. Both
//! descriptors are created exactly once and never regenerated; later edits
//! to the Inventory or Cluster do not rewrite an already-seeded machine.

use tracing::{debug, info};

use tink::{generate_hardware, generate_workflow};

use crate::error::ControllerError;
use crate::store::ResourceStore;

use super::Reconciler;

impl<S: ResourceStore> Reconciler<S> {
    /// Reconcile one inventory by namespaced name.
    pub async fn reconcile_inventory(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<(), ControllerError> {
        info!("Reconciling Inventory {}/{}", namespace, name);

        let Some(inventory) = self.store().get_inventory(namespace, name).await? else {
            debug!("Inventory {}/{} no longer exists", namespace, name);
            return Ok(());
        };

        if inventory.metadata.deletion_timestamp.is_some() {
            debug!("Inventory {}/{} is being deleted", namespace, name);
            return Ok(());
        }

        let status = inventory.status.clone().unwrap_or_default();
        if status.cluster.is_empty() || status.pxe_boot_interface.address.is_empty() {
            debug!(
                "Inventory {}/{} not yet allocated to a cluster",
                namespace, name
            );
            return Ok(());
        }

        // The allocation step recorded a cluster reference, so its absence
        // here is an inconsistency worth retrying, not a benign wait.
        let cluster = self
            .store()
            .get_cluster(&status.cluster.namespace, &status.cluster.name)
            .await?
            .ok_or_else(|| {
                ControllerError::ClusterUnavailable(
                    format!("{}/{}", status.cluster.namespace, status.cluster.name),
                    format!("{namespace}/{name}"),
                )
            })?;

        let cluster_status = cluster.status.clone().unwrap_or_default();
        if cluster_status.cluster_token.is_empty() || cluster_status.cluster_address.is_empty() {
            debug!(
                "Cluster {}/{} has no token or address yet, waiting",
                status.cluster.namespace, status.cluster.name
            );
            return Ok(());
        }

        if self.store().get_hardware(namespace, name).await?.is_none() {
            let hardware = generate_hardware(&inventory, &cluster)?;
            info!("Creating Hardware {}/{}", namespace, name);
            self.store().create_hardware(&hardware).await?;
        }

        if self.store().get_workflow(namespace, name).await?.is_none() {
            let workflow = generate_workflow(&inventory, &cluster);
            info!("Creating Workflow {}/{}", namespace, name);
            self.store().create_workflow(&workflow).await?;
        }

        Ok(())
    }
}
