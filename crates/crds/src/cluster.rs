//! Cluster CRD
//!
//! A logical group of Inventories forming one installation, sharing a
//! virtual IP. The status (token, resolved address) is populated by the
//! VIP-allocation process; the seeding core only reads it.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::references::ObjectReference;

/// Kind string used in owner references pointing back at a Cluster.
pub const KIND_CLUSTER: &str = "Cluster";

/// apiVersion string used in owner references pointing back at a Cluster.
pub const API_VERSION_CLUSTER: &str = "metal.harvesterhci.io/v1alpha1";

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "metal.harvesterhci.io",
    version = "v1alpha1",
    kind = "Cluster",
    namespaced,
    status = "ClusterStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Target product version (e.g. "v1.1.0"). Selects the node-config
    /// schema variant; absent or garbled versions fall back to the oldest
    /// supported schema.
    #[serde(default)]
    pub harvester_version: String,

    /// Virtual IP configuration for the installation
    #[serde(default)]
    pub vip_config: VipConfig,

    /// Member nodes of this installation
    #[serde(default)]
    pub nodes: Vec<ClusterNode>,

    /// Cluster-wide installer configuration
    #[serde(default)]
    pub cluster_config: ClusterConfig,
}

/// Virtual/floating address configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VipConfig {
    /// Pool the VIP is drawn from
    #[serde(default)]
    pub address_pool_reference: ObjectReference,

    /// Statically assigned VIP, bypassing pool allocation
    #[serde(default)]
    pub static_address: String,
}

/// One member node of the installation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNode {
    /// Inventory backing this node
    #[serde(default)]
    pub inventory_reference: ObjectReference,

    /// Pool the node address is drawn from
    #[serde(default)]
    pub address_pool_reference: ObjectReference,
}

/// Installer configuration shared by all member nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    /// DNS servers written into the node configuration
    #[serde(default)]
    pub nameservers: Vec<String>,

    /// SSH public keys authorized on every node
    #[serde(default)]
    pub ssh_keys: Vec<String>,

    /// URL the installer fetches extra configuration from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_url: Option<String>,

    /// Provisioning template overriding the built-in default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_provisioning_template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    /// Join token shared by member nodes
    #[serde(default)]
    pub cluster_token: String,

    /// Resolved cluster address (the VIP)
    #[serde(default)]
    pub cluster_address: String,

    /// Lifecycle status
    #[serde(default)]
    pub status: ClusterState,
}

/// Cluster lifecycle states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ClusterState {
    /// Waiting for VIP allocation
    #[default]
    Pending,

    /// Token and address resolved, nodes may be seeded
    Ready,
}
