//! Reconciliation logic for the provisioning controller.
//!
//! Two reconcilers share one `Reconciler` value:
//! - `inventory`: seeds Hardware/Workflow descriptors once allocation is done
//! - `workflow`: reacts to workflow completion (netboot flags, cluster events)
//!
//! Each pass is a stateless read-mutate-emit over the store; re-entry at any
//! point is safe because every step is idempotent or side-effect free.

mod inventory;
mod workflow;

#[cfg(test)]
mod workflow_test;

pub use workflow::REASON_PROVISIONING_WORKFLOW;

use crate::store::ResourceStore;

/// Reconciles Inventory and Workflow resources against a store.
pub struct Reconciler<S> {
    store: S,
}

impl<S: ResourceStore> Reconciler<S> {
    /// Creates a new reconciler over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store (used by tests to seed and inspect state).
    pub fn store(&self) -> &S {
        &self.store
    }
}
