//! Descriptor generation for the provisioning engine
//!
//! Pure builders that translate an Inventory/Cluster pair into the Hardware
//! and Workflow objects the provisioning engine consumes, including the
//! version-dispatched node-configuration payload embedded in the Hardware
//! record. No I/O happens here; persistence is the controller's job.

pub mod config;
pub mod error;
pub mod hardware;
pub mod workflow;

pub use config::{generate_node_config, schema_variant_for, InstallMode, NodeConfig, SchemaVariant};
pub use error::{ConfigError, GenerateError};
pub use hardware::generate_hardware;
pub use workflow::{generate_workflow, DEFAULT_PROVISIONING_TEMPLATE};
