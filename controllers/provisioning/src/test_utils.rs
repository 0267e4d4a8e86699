//! Shared test fixtures and an in-memory `ResourceStore`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;

use crds::{
    Cluster, ClusterConfig, ClusterNode, ClusterSpec, ClusterStatus, Hardware, Inventory,
    InventorySpec, InventoryState, InventoryStatus, ObjectReference, PxeBootInterface, VipConfig,
    Workflow, WorkflowState, WorkflowStatus,
};

use crate::store::{EventSeverity, ResourceStore, StoreError};

/// One event captured by the in-memory store.
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub cluster_name: String,
    pub severity: EventSeverity,
    pub reason: String,
    pub note: String,
}

type Key = (String, String);

fn key(namespace: &str, name: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

fn object_key<K: kube::Resource>(resource: &K) -> Key {
    (
        resource.meta().namespace.clone().unwrap_or_default(),
        resource.name_any(),
    )
}

/// In-memory stand-in for the Kubernetes-backed store.
#[derive(Default)]
pub struct MemoryStore {
    inventories: Mutex<HashMap<Key, Inventory>>,
    clusters: Mutex<HashMap<Key, Cluster>>,
    hardware: Mutex<HashMap<Key, Hardware>>,
    workflows: Mutex<HashMap<Key, Workflow>>,
    events: Mutex<Vec<RecordedEvent>>,
    fail_cluster_reads: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_inventory(&self, inventory: Inventory) {
        self.inventories
            .lock()
            .unwrap()
            .insert(object_key(&inventory), inventory);
    }

    pub fn put_cluster(&self, cluster: Cluster) {
        self.clusters
            .lock()
            .unwrap()
            .insert(object_key(&cluster), cluster);
    }

    pub fn put_hardware(&self, hardware: Hardware) {
        self.hardware
            .lock()
            .unwrap()
            .insert(object_key(&hardware), hardware);
    }

    pub fn put_workflow(&self, workflow: Workflow) {
        self.workflows
            .lock()
            .unwrap()
            .insert(object_key(&workflow), workflow);
    }

    pub fn hardware(&self, namespace: &str, name: &str) -> Option<Hardware> {
        self.hardware.lock().unwrap().get(&key(namespace, name)).cloned()
    }

    pub fn workflow(&self, namespace: &str, name: &str) -> Option<Workflow> {
        self.workflows.lock().unwrap().get(&key(namespace, name)).cloned()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Make every cluster read fail, simulating an API outage.
    pub fn fail_cluster_reads(&self) {
        *self.fail_cluster_reads.lock().unwrap() = true;
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn get_inventory(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Inventory>, StoreError> {
        Ok(self
            .inventories
            .lock()
            .unwrap()
            .get(&key(namespace, name))
            .cloned())
    }

    async fn get_cluster(&self, namespace: &str, name: &str) -> Result<Option<Cluster>, StoreError> {
        if *self.fail_cluster_reads.lock().unwrap() {
            return Err(StoreError::Other("cluster read failed".to_string()));
        }
        Ok(self
            .clusters
            .lock()
            .unwrap()
            .get(&key(namespace, name))
            .cloned())
    }

    async fn get_hardware(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Hardware>, StoreError> {
        Ok(self
            .hardware
            .lock()
            .unwrap()
            .get(&key(namespace, name))
            .cloned())
    }

    async fn get_workflow(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Workflow>, StoreError> {
        Ok(self
            .workflows
            .lock()
            .unwrap()
            .get(&key(namespace, name))
            .cloned())
    }

    async fn create_hardware(&self, hardware: &Hardware) -> Result<(), StoreError> {
        let mut map = self.hardware.lock().unwrap();
        let k = object_key(hardware);
        if map.contains_key(&k) {
            return Err(StoreError::Other(format!("hardware {k:?} already exists")));
        }
        map.insert(k, hardware.clone());
        Ok(())
    }

    async fn create_workflow(&self, workflow: &Workflow) -> Result<(), StoreError> {
        let mut map = self.workflows.lock().unwrap();
        let k = object_key(workflow);
        if map.contains_key(&k) {
            return Err(StoreError::Other(format!("workflow {k:?} already exists")));
        }
        map.insert(k, workflow.clone());
        Ok(())
    }

    async fn update_hardware(&self, hardware: &Hardware) -> Result<(), StoreError> {
        let mut map = self.hardware.lock().unwrap();
        let k = object_key(hardware);
        if !map.contains_key(&k) {
            return Err(StoreError::Other(format!("hardware {k:?} not found")));
        }
        map.insert(k, hardware.clone());
        Ok(())
    }

    async fn publish_cluster_event(
        &self,
        cluster: &Cluster,
        severity: EventSeverity,
        reason: &str,
        note: String,
    ) -> Result<(), StoreError> {
        self.events.lock().unwrap().push(RecordedEvent {
            cluster_name: cluster.name_any(),
            severity,
            reason: reason.to_string(),
            note,
        });
        Ok(())
    }
}

/// An inventory that has been through allocation: bound to "harvester-one"
/// with a PXE address assigned.
pub fn allocated_inventory(name: &str, namespace: &str) -> Inventory {
    Inventory {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: InventorySpec {
            primary_disk: "/dev/sda".to_string(),
            management_interface_mac_address: "xx:xx:xx:xx:xx".to_string(),
            ..Default::default()
        },
        status: Some(InventoryStatus {
            status: InventoryState::Ready,
            generated_password: "password".to_string(),
            hardware_id: "uuid".to_string(),
            cluster: ObjectReference::new("harvester-one", namespace),
            pxe_boot_interface: PxeBootInterface {
                address: "192.168.1.129".to_string(),
                netmask: "255.255.255.0".to_string(),
                gateway: "192.168.1.1".to_string(),
                name_servers: vec!["8.8.8.8".to_string()],
            },
        }),
    }
}

/// A cluster whose token and address have been resolved.
pub fn ready_cluster(namespace: &str, version: &str) -> Cluster {
    Cluster {
        metadata: ObjectMeta {
            name: Some("harvester-one".to_string()),
            namespace: Some(namespace.to_string()),
            uid: Some("cluster-uid".to_string()),
            ..Default::default()
        },
        spec: ClusterSpec {
            harvester_version: version.to_string(),
            vip_config: VipConfig {
                static_address: "192.168.1.100".to_string(),
                ..Default::default()
            },
            nodes: vec![ClusterNode {
                inventory_reference: ObjectReference::new("firstnode", namespace),
                address_pool_reference: ObjectReference::new("management-pool", namespace),
            }],
            cluster_config: ClusterConfig {
                nameservers: vec!["8.8.8.8".to_string()],
                ssh_keys: vec!["abc".to_string()],
                config_url: None,
                custom_provisioning_template: None,
            },
        },
        status: Some(ClusterStatus {
            cluster_token: "token".to_string(),
            cluster_address: "192.168.1.100".to_string(),
            status: Default::default(),
        }),
    }
}

/// A workflow in the given execution state, named after its inventory.
pub fn workflow_in_state(name: &str, namespace: &str, state: WorkflowState) -> Workflow {
    Workflow {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: Default::default(),
        status: Some(WorkflowStatus { state }),
    }
}
