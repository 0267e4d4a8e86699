//! Hardware CRD (tinkerbell.org)
//!
//! The provisioning engine's record of a machine: DHCP/netboot parameters,
//! disks, and the embedded node-configuration payload. Created once per
//! Inventory by the hardware builder; thereafter only the boot-control flags
//! are ever mutated, and only downwards.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::cluster::KIND_CLUSTER;
use crate::references::ObjectReference;

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "tinkerbell.org",
    version = "v1alpha1",
    kind = "Hardware",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSpec {
    /// Node-configuration payload handed to the install-time agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,

    /// Network interfaces known to the provisioning engine
    #[serde(default)]
    pub interfaces: Vec<Interface>,

    /// Disks attached to the machine
    #[serde(default)]
    pub disks: Vec<Disk>,

    /// Facility and instance metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HardwareMetadata>,
}

/// One interface record: boot-control flags plus DHCP parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    /// Boot-control flags for this interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netboot: Option<Netboot>,

    /// DHCP parameters bound to this interface's MAC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<Dhcp>,
}

/// Boot-control flags. The hardware builder always writes both flags
/// explicitly, so absent values deserialize as disabled.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Netboot {
    /// Permit network boot (iPXE)
    #[serde(default, rename = "allowPXE")]
    pub allow_pxe: bool,

    /// Permit workflow execution against this interface
    #[serde(default)]
    pub allow_workflow: bool,
}

/// DHCP lease parameters. Field names follow the provisioning engine's wire
/// format (snake_case).
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Dhcp {
    /// Hardware address the lease is bound to
    #[serde(default)]
    pub mac: String,

    /// Hostname handed out with the lease
    #[serde(default)]
    pub hostname: String,

    /// Lease time in seconds
    #[serde(default)]
    pub lease_time: i64,

    /// Machine architecture (e.g. "x86_64")
    #[serde(default)]
    pub arch: String,

    /// Boot in UEFI mode
    #[serde(default)]
    pub uefi: bool,

    /// Static address configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<DhcpIp>,
}

/// Static address block inside a DHCP record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DhcpIp {
    /// Assigned address
    #[serde(default)]
    pub address: String,

    /// Netmask
    #[serde(default)]
    pub netmask: String,

    /// Default gateway
    #[serde(default)]
    pub gateway: String,
}

/// One disk record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Disk {
    /// Device path (e.g. "/dev/sda")
    #[serde(default)]
    pub device: String,
}

/// Facility and instance metadata attached to the hardware.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct HardwareMetadata {
    /// Facility the machine lives in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<MetadataFacility>,

    /// Instance-level metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<MetadataInstance>,
}

/// Facility code record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MetadataFacility {
    /// Facility code (e.g. "on_prem")
    #[serde(default)]
    pub facility_code: String,
}

/// Instance metadata: OS identity plus the node-configuration payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct MetadataInstance {
    /// Node-configuration payload, mirrored from the spec
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userdata: Option<String>,

    /// Operating system to install
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<OperatingSystem>,
}

/// Operating system identity.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct OperatingSystem {
    /// Distribution name
    #[serde(default)]
    pub distro: String,

    /// Distribution version
    #[serde(default)]
    pub version: String,
}

impl Hardware {
    /// True while any interface still permits network boot or workflow
    /// execution.
    pub fn netboot_allowed(&self) -> bool {
        self.spec
            .interfaces
            .iter()
            .any(|i| i.netboot.is_some_and(|n| n.allow_pxe || n.allow_workflow))
    }

    /// Lower both boot-control flags on every interface. Flags are never
    /// raised again once lowered.
    pub fn disable_netboot(&mut self) {
        for interface in &mut self.spec.interfaces {
            if let Some(netboot) = interface.netboot.as_mut() {
                netboot.allow_pxe = false;
                netboot.allow_workflow = false;
            }
        }
    }

    /// Resolve the owner back-reference to a Cluster, if one was recorded
    /// by the admission step. Owners live in the hardware's own namespace.
    pub fn owner_cluster_ref(&self) -> Option<ObjectReference> {
        self.metadata
            .owner_references
            .as_ref()?
            .iter()
            .find(|r| r.kind == KIND_CLUSTER)
            .map(|r| {
                ObjectReference::new(
                    r.name.clone(),
                    self.metadata.namespace.clone().unwrap_or_default(),
                )
            })
    }
}
