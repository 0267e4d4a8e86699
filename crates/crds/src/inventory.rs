//! Inventory CRD
//!
//! One registered physical machine under management. The spec records the
//! operator's intent (disk, management NIC, out-of-band connection); the
//! status is populated by the allocation process before the descriptor
//! builders run.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::references::ObjectReference;

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "metal.harvesterhci.io",
    version = "v1alpha1",
    kind = "Inventory",
    namespaced,
    status = "InventoryStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct InventorySpec {
    /// Device path of the disk the installer targets (e.g. "/dev/sda")
    #[serde(default)]
    pub primary_disk: String,

    /// Hardware address of the management interface. Exactly one address is
    /// authoritative for DHCP and netboot binding.
    #[serde(default)]
    pub management_interface_mac_address: String,

    /// Out-of-band management (BMC) connection parameters. Consumed by a
    /// separate collaborator, never by the seeding core.
    #[serde(default)]
    pub baseboard: BaseboardConnection,

    /// Provisioning-intent markers recorded against this machine
    #[serde(default)]
    pub conditions: Vec<InventoryCondition>,
}

/// Connection parameters for the machine's baseboard management controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BaseboardConnection {
    /// BMC host address
    #[serde(default)]
    pub host: String,

    /// BMC port (typically 623 for IPMI)
    #[serde(default)]
    pub port: u16,

    /// Skip TLS verification when talking to the BMC
    #[serde(default)]
    pub insecure_tls: bool,

    /// Secret holding BMC credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_secret_ref: Option<ObjectReference>,
}

/// A named condition recording provisioning intent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCondition {
    /// Condition type
    #[serde(rename = "type")]
    pub condition_type: ConditionType,

    /// Free-form detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Known condition types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionType {
    /// This machine bootstraps the cluster (install mode "create"); all
    /// others join the node it created
    CreateNode,

    /// The machine has been allocated to a cluster
    AllocatedToCluster,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStatus {
    /// Lifecycle status
    #[serde(default)]
    pub status: InventoryState,

    /// Install-time password generated for this node
    #[serde(default)]
    pub generated_password: String,

    /// Hardware identifier reported during registration
    #[serde(default)]
    pub hardware_id: String,

    /// Back-reference to the owning Cluster, set during allocation
    #[serde(default)]
    pub cluster: ObjectReference,

    /// Network parameters assigned for PXE boot
    #[serde(default)]
    pub pxe_boot_interface: PxeBootInterface,
}

/// Address assignment for the management interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PxeBootInterface {
    /// Assigned IP address
    #[serde(default)]
    pub address: String,

    /// Netmask for the assigned address
    #[serde(default)]
    pub netmask: String,

    /// Default gateway
    #[serde(default)]
    pub gateway: String,

    /// DNS servers handed out with the lease
    #[serde(default)]
    pub name_servers: Vec<String>,
}

/// Inventory lifecycle states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InventoryState {
    /// Registered but not yet allocated
    #[default]
    Registered,

    /// Allocated and ready for provisioning
    Ready,

    /// Provisioning has completed
    Provisioned,
}

impl Inventory {
    /// True when the given condition is recorded against this machine.
    pub fn has_condition(&self, condition_type: ConditionType) -> bool {
        self.spec
            .conditions
            .iter()
            .any(|c| c.condition_type == condition_type)
    }

    /// Record a condition, replacing any existing entry of the same type.
    pub fn set_condition(&mut self, condition_type: ConditionType, message: Option<String>) {
        self.remove_condition(condition_type);
        self.spec.conditions.push(InventoryCondition {
            condition_type,
            message,
        });
    }

    /// Drop a condition if present.
    pub fn remove_condition(&mut self, condition_type: ConditionType) {
        self.spec
            .conditions
            .retain(|c| c.condition_type != condition_type);
    }
}
