//! Workflow reconciler
//!
//! Watches workflow status and disables netboot/workflow execution on the
//! matching Hardware record once provisioning succeeds. The default
//! provisioning template reboots the machine after install; without this
//! the machine would netboot straight back into the installer.

use tracing::{debug, info};

use crds::{Cluster, Hardware, WorkflowState};

use crate::error::ControllerError;
use crate::store::{EventSeverity, ResourceStore};

use super::Reconciler;

/// Reason tag carried by events published against the owning Cluster.
pub const REASON_PROVISIONING_WORKFLOW: &str = "ProvisioningWorkflow";

impl<S: ResourceStore> Reconciler<S> {
    /// Reconcile one workflow by namespaced name.
    ///
    /// On the pass that observes success with netboot still allowed, only
    /// the hardware mutation happens; the success event is published by a
    /// later pass over the already-disabled hardware. That ordering is part
    /// of the observed contract and is pinned by a regression test.
    pub async fn reconcile_workflow(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<(), ControllerError> {
        info!("Reconciling Workflow {}/{}", namespace, name);

        let Some(workflow) = self.store().get_workflow(namespace, name).await? else {
            // object gone, nothing to reconcile
            debug!("Workflow {}/{} no longer exists", namespace, name);
            return Ok(());
        };

        if workflow.metadata.deletion_timestamp.is_some() {
            // no cleanup is performed on delete
            debug!("Workflow {}/{} is being deleted", namespace, name);
            return Ok(());
        }

        let state = workflow.state();
        debug!("Workflow {}/{} state: {:?}", namespace, name, state);

        // A missing Hardware record is retried like any other fetch failure;
        // genuine hardware deletion keeps the workflow requeueing.
        let mut hardware = self
            .store()
            .get_hardware(namespace, name)
            .await?
            .ok_or_else(|| ControllerError::HardwareUnavailable(format!("{namespace}/{name}")))?;

        if state == WorkflowState::Success && hardware.netboot_allowed() {
            hardware.disable_netboot();
            info!(
                "Provisioning succeeded, disabling netboot for Hardware {}/{}",
                namespace, name
            );
            self.store().update_hardware(&hardware).await?;
            return Ok(());
        }

        if let Some(cluster) = self.owner_cluster(&hardware, name).await? {
            match state {
                WorkflowState::Success => {
                    self.store()
                        .publish_cluster_event(
                            &cluster,
                            EventSeverity::Normal,
                            REASON_PROVISIONING_WORKFLOW,
                            format!("workflow event for {name}"),
                        )
                        .await?;
                }
                WorkflowState::Failed => {
                    self.store()
                        .publish_cluster_event(
                            &cluster,
                            EventSeverity::Warning,
                            REASON_PROVISIONING_WORKFLOW,
                            format!("workflow event for {name}"),
                        )
                        .await?;
                }
                WorkflowState::Pending | WorkflowState::Running => {}
            }
        }

        Ok(())
    }

    /// Resolve the Cluster owning a Hardware record. An absent owner
    /// reference or a Cluster that no longer exists means "no owner", not
    /// an error; any other lookup failure is transient.
    async fn owner_cluster(
        &self,
        hardware: &Hardware,
        workflow_name: &str,
    ) -> Result<Option<Cluster>, ControllerError> {
        let Some(owner) = hardware.owner_cluster_ref() else {
            return Ok(None);
        };
        self.store()
            .get_cluster(&owner.namespace, &owner.name)
            .await
            .map_err(|e| ControllerError::OwnerLookup(workflow_name.to_string(), e))
    }
}
