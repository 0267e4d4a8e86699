//! Workflow reconciler tests.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::Time;
use k8s_openapi::chrono::Utc;

use crds::WorkflowState;
use tink::generate_hardware;

use crate::error::ControllerError;
use crate::store::{EventSeverity, ResourceStore};
use crate::test_utils::{allocated_inventory, ready_cluster, workflow_in_state, MemoryStore};

use super::{Reconciler, REASON_PROVISIONING_WORKFLOW};

const NS: &str = "default";
const NODE: &str = "firstnode";

/// Reconciler seeded with a ready cluster, its hardware record (flags up),
/// and a workflow in the given state.
fn seeded(state: WorkflowState) -> Reconciler<MemoryStore> {
    let store = MemoryStore::new();
    let inventory = allocated_inventory(NODE, NS);
    let cluster = ready_cluster(NS, "v1.1.0");
    store.put_hardware(generate_hardware(&inventory, &cluster).unwrap());
    store.put_cluster(cluster);
    store.put_workflow(workflow_in_state(NODE, NS, state));
    Reconciler::new(store)
}

#[tokio::test]
async fn success_lowers_netboot_without_publishing() {
    let reconciler = seeded(WorkflowState::Success);

    reconciler.reconcile_workflow(NS, NODE).await.unwrap();

    let hardware = reconciler.store().hardware(NS, NODE).unwrap();
    assert!(!hardware.netboot_allowed());
    let netboot = hardware.spec.interfaces[0].netboot.unwrap();
    assert!(!netboot.allow_pxe);
    assert!(!netboot.allow_workflow);

    // the success event belongs to the next pass
    assert!(reconciler.store().events().is_empty());
}

#[tokio::test]
async fn second_success_pass_publishes_one_event() {
    let reconciler = seeded(WorkflowState::Success);

    reconciler.reconcile_workflow(NS, NODE).await.unwrap();
    reconciler.reconcile_workflow(NS, NODE).await.unwrap();

    let events = reconciler.store().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, EventSeverity::Normal);
    assert_eq!(events[0].reason, REASON_PROVISIONING_WORKFLOW);
    assert_eq!(events[0].note, format!("workflow event for {NODE}"));
    assert_eq!(events[0].cluster_name, "harvester-one");
}

#[tokio::test]
async fn repeated_success_passes_keep_flags_down() {
    let reconciler = seeded(WorkflowState::Success);

    for _ in 0..3 {
        reconciler.reconcile_workflow(NS, NODE).await.unwrap();
    }

    assert!(!reconciler.store().hardware(NS, NODE).unwrap().netboot_allowed());
}

#[tokio::test]
async fn failure_publishes_warning_and_keeps_flags() {
    let reconciler = seeded(WorkflowState::Failed);

    reconciler.reconcile_workflow(NS, NODE).await.unwrap();

    assert!(reconciler.store().hardware(NS, NODE).unwrap().netboot_allowed());

    let events = reconciler.store().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].severity, EventSeverity::Warning);
    assert_eq!(events[0].reason, REASON_PROVISIONING_WORKFLOW);
}

#[tokio::test]
async fn pending_and_running_are_no_ops() {
    for state in [WorkflowState::Pending, WorkflowState::Running] {
        let reconciler = seeded(state);

        reconciler.reconcile_workflow(NS, NODE).await.unwrap();

        assert!(reconciler.store().hardware(NS, NODE).unwrap().netboot_allowed());
        assert!(reconciler.store().events().is_empty());
    }
}

#[tokio::test]
async fn missing_workflow_is_benign() {
    let reconciler = Reconciler::new(MemoryStore::new());
    reconciler.reconcile_workflow(NS, "gone").await.unwrap();
    assert!(reconciler.store().events().is_empty());
}

#[tokio::test]
async fn deleting_workflow_leaves_hardware_alone() {
    let reconciler = seeded(WorkflowState::Success);
    let mut workflow = workflow_in_state(NODE, NS, WorkflowState::Success);
    workflow.metadata.deletion_timestamp = Some(Time(Utc::now()));
    reconciler.store().put_workflow(workflow);

    reconciler.reconcile_workflow(NS, NODE).await.unwrap();

    assert!(reconciler.store().hardware(NS, NODE).unwrap().netboot_allowed());
    assert!(reconciler.store().events().is_empty());
}

#[tokio::test]
async fn missing_hardware_is_retried() {
    let store = MemoryStore::new();
    store.put_workflow(workflow_in_state(NODE, NS, WorkflowState::Success));
    let reconciler = Reconciler::new(store);

    let err = reconciler.reconcile_workflow(NS, NODE).await.unwrap_err();
    assert!(matches!(err, ControllerError::HardwareUnavailable(_)));
}

#[tokio::test]
async fn unowned_hardware_publishes_nothing() {
    let reconciler = seeded(WorkflowState::Failed);
    let mut hardware = reconciler.store().hardware(NS, NODE).unwrap();
    hardware.metadata.owner_references = None;
    reconciler.store().update_hardware(&hardware).await.unwrap();

    reconciler.reconcile_workflow(NS, NODE).await.unwrap();

    assert!(reconciler.store().events().is_empty());
}

#[tokio::test]
async fn vanished_owner_cluster_publishes_nothing() {
    let store = MemoryStore::new();
    let inventory = allocated_inventory(NODE, NS);
    let cluster = ready_cluster(NS, "v1.1.0");
    store.put_hardware(generate_hardware(&inventory, &cluster).unwrap());
    // cluster deliberately not stored
    store.put_workflow(workflow_in_state(NODE, NS, WorkflowState::Failed));
    let reconciler = Reconciler::new(store);

    reconciler.reconcile_workflow(NS, NODE).await.unwrap();

    assert!(reconciler.store().events().is_empty());
}

#[tokio::test]
async fn owner_lookup_failure_propagates() {
    let reconciler = seeded(WorkflowState::Failed);
    reconciler.store().fail_cluster_reads();

    let err = reconciler.reconcile_workflow(NS, NODE).await.unwrap_err();
    assert!(matches!(err, ControllerError::OwnerLookup(name, _) if name == NODE));
}
