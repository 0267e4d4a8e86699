//! Workflow CRD (tinkerbell.org)
//!
//! Binds a provisioning template to a Hardware record. Created once by the
//! workflow builder; the status is owned by the provisioning engine and is
//! read-only to the seeding core.

use std::collections::BTreeMap;

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "tinkerbell.org",
    version = "v1alpha1",
    kind = "Workflow",
    namespaced,
    status = "WorkflowStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    /// Provisioning template to execute
    #[serde(default)]
    pub template_ref: String,

    /// Hardware record the template runs against
    #[serde(default)]
    pub hardware_ref: String,

    /// Logical device slot to MAC address bindings used by the template
    /// engine (e.g. "device_1" -> management MAC)
    #[serde(default)]
    pub hardware_map: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatus {
    /// Execution state reported by the provisioning engine
    #[serde(default)]
    pub state: WorkflowState,
}

/// Workflow execution states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowState {
    /// Queued, not yet started
    #[default]
    Pending,

    /// Actions executing on the machine
    Running,

    /// All actions completed
    Success,

    /// An action failed
    Failed,
}

impl Workflow {
    /// Execution state, defaulting to pending while the engine has not
    /// reported yet.
    pub fn state(&self) -> WorkflowState {
        self.status.as_ref().map_or(WorkflowState::Pending, |s| s.state)
    }
}
