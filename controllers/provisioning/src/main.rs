//! Provisioning Controller
//!
//! Watches Inventory and Workflow resources:
//! - Inventory: once a machine is allocated to a cluster, generates the
//!   Hardware and Workflow descriptors the provisioning engine needs to
//!   image and boot it.
//! - Workflow: once provisioning succeeds, lowers the hardware's netboot
//!   flags so the machine boots into its installed OS instead of looping
//!   back into the installer, and reports the outcome as events on the
//!   owning Cluster.

mod controller;
mod error;
mod reconciler;
mod store;
mod watcher;

#[cfg(test)]
mod test_utils;

use std::env;

use tracing::info;

use controller::Controller;
use error::ControllerError;

#[tokio::main]
async fn main() -> Result<(), ControllerError> {
    tracing_subscriber::fmt::init();

    info!("Starting Provisioning Controller");

    // Load configuration from environment variables
    let namespace = env::var("WATCH_NAMESPACE").ok();
    info!(
        "Watching namespace: {}",
        namespace.as_deref().unwrap_or("default")
    );

    // Initialize and run controller
    let controller = Controller::new(namespace).await?;
    controller.run().await?;

    Ok(())
}
