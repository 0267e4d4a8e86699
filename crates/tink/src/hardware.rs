//! Hardware descriptor generation
//!
//! Derives the provisioning engine's Hardware record from an
//! Inventory/Cluster pair. Pure: every field comes from the inputs or from
//! the fixed constants below, and the only failure mode is payload
//! rendering.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};

use crds::{
    Cluster, ConditionType, Dhcp, DhcpIp, Disk, Hardware, HardwareMetadata, HardwareSpec,
    Interface, Inventory, MetadataFacility, MetadataInstance, Netboot, OperatingSystem,
    API_VERSION_CLUSTER, KIND_CLUSTER,
};

use crate::config::{generate_node_config, InstallMode, NodeConfig};
use crate::error::GenerateError;

/// Back-reference letting the workflow reconciler find the owning Cluster
/// from a Hardware or Workflow record.
pub(crate) fn cluster_owner_reference(cluster: &Cluster) -> OwnerReference {
    OwnerReference {
        api_version: API_VERSION_CLUSTER.to_string(),
        kind: KIND_CLUSTER.to_string(),
        name: cluster.metadata.name.clone().unwrap_or_default(),
        uid: cluster.metadata.uid.clone().unwrap_or_default(),
        ..Default::default()
    }
}

/// DHCP lease time handed to every machine, in seconds.
pub const DEFAULT_LEASE_TIME: i64 = 86400;

/// Architecture constant written into every DHCP record.
pub const DEFAULT_ARCH: &str = "x86_64";

/// Facility code for on-premise machines.
pub const DEFAULT_FACILITY_CODE: &str = "on_prem";

/// OS distribution installed by the provisioning templates.
pub const DEFAULT_DISTRO: &str = "harvester";

/// Build the Hardware descriptor for one Inventory/Cluster pair.
///
/// The install mode follows the Inventory's create-node condition; both
/// boot-control flags start raised and are only ever lowered by the
/// workflow reconciler. Zero-valued Inventory/Cluster fields pass through
/// unvalidated; callers gate on allocation having run.
pub fn generate_hardware(inventory: &Inventory, cluster: &Cluster) -> Result<Hardware, GenerateError> {
    let name = inventory.metadata.name.clone().unwrap_or_default();
    let namespace = inventory.metadata.namespace.clone().unwrap_or_default();
    let status = inventory.status.clone().unwrap_or_default();
    let cluster_status = cluster.status.clone().unwrap_or_default();

    let mode = if inventory.has_condition(ConditionType::CreateNode) {
        InstallMode::Create
    } else {
        InstallMode::Join
    };

    let config = NodeConfig {
        config_url: cluster
            .spec
            .cluster_config
            .config_url
            .clone()
            .unwrap_or_default(),
        mac_address: inventory.spec.management_interface_mac_address.clone(),
        mode,
        disk: inventory.spec.primary_disk.clone(),
        vip: cluster_status.cluster_address,
        token: cluster_status.cluster_token,
        password: status.generated_password,
        address: status.pxe_boot_interface.address.clone(),
        netmask: status.pxe_boot_interface.netmask.clone(),
        gateway: status.pxe_boot_interface.gateway.clone(),
        nameservers: cluster.spec.cluster_config.nameservers.clone(),
        ssh_keys: cluster.spec.cluster_config.ssh_keys.clone(),
    };

    let user_data = generate_node_config(&cluster.spec.harvester_version, &config).map_err(
        |source| GenerateError::NodeConfig {
            name: name.clone(),
            source,
        },
    )?;

    Ok(Hardware {
        metadata: ObjectMeta {
            name: Some(name.clone()),
            namespace: Some(namespace.clone()),
            owner_references: Some(vec![cluster_owner_reference(cluster)]),
            ..Default::default()
        },
        spec: HardwareSpec {
            user_data: Some(user_data.clone()),
            interfaces: vec![Interface {
                netboot: Some(Netboot {
                    allow_pxe: true,
                    allow_workflow: true,
                }),
                dhcp: Some(Dhcp {
                    mac: inventory.spec.management_interface_mac_address.clone(),
                    hostname: format!("{name}-{namespace}"),
                    lease_time: DEFAULT_LEASE_TIME,
                    arch: DEFAULT_ARCH.to_string(),
                    uefi: true,
                    ip: Some(DhcpIp {
                        address: status.pxe_boot_interface.address,
                        netmask: status.pxe_boot_interface.netmask,
                        gateway: status.pxe_boot_interface.gateway,
                    }),
                }),
            }],
            disks: vec![Disk {
                device: inventory.spec.primary_disk.clone(),
            }],
            metadata: Some(HardwareMetadata {
                facility: Some(MetadataFacility {
                    facility_code: DEFAULT_FACILITY_CODE.to_string(),
                }),
                instance: Some(MetadataInstance {
                    userdata: Some(user_data),
                    operating_system: Some(OperatingSystem {
                        distro: DEFAULT_DISTRO.to_string(),
                        version: cluster.spec.harvester_version.clone(),
                    }),
                }),
            }),
        },
    })
}
