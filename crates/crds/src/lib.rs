//! Seeder CRD Definitions
//!
//! Kubernetes Custom Resource Definitions for bare-metal seeding:
//! - Inventory / Cluster: the declarative intent (group `metal.harvesterhci.io`)
//! - Hardware / Workflow: the provisioning engine's view (group `tinkerbell.org`)

pub mod cluster;
pub mod hardware;
pub mod inventory;
pub mod references;
pub mod workflow;

pub use cluster::*;
pub use hardware::*;
pub use inventory::*;
pub use references::*;
pub use workflow::*;
