//! Workflow descriptor generation
//!
//! Binds the provisioning template to the Hardware record generated for an
//! Inventory. Must exist before the machine netboots so the right template
//! executes on the first boot.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crds::{Cluster, Inventory, Workflow, WorkflowSpec};

use crate::hardware::cluster_owner_reference;

/// Template used when the cluster does not override provisioning.
pub const DEFAULT_PROVISIONING_TEMPLATE: &str = "harvester-provisioning";

/// Logical slot the template engine resolves to the management NIC.
const DEVICE_SLOT: &str = "device_1";

/// Build the Workflow descriptor for one Inventory/Cluster pair.
///
/// Single-NIC assumption: the device map binds exactly one slot to the
/// management MAC.
pub fn generate_workflow(inventory: &Inventory, cluster: &Cluster) -> Workflow {
    let name = inventory.metadata.name.clone().unwrap_or_default();
    let namespace = inventory.metadata.namespace.clone().unwrap_or_default();

    let template_ref = cluster
        .spec
        .cluster_config
        .custom_provisioning_template
        .clone()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_PROVISIONING_TEMPLATE.to_string());

    Workflow {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace),
            owner_references: Some(vec![cluster_owner_reference(cluster)]),
            ..Default::default()
        },
        spec: WorkflowSpec {
            template_ref,
            hardware_ref: name,
            hardware_map: BTreeMap::from([(
                DEVICE_SLOT.to_string(),
                inventory.spec.management_interface_mac_address.clone(),
            )]),
        },
        status: None,
    }
}
