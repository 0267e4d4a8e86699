//! Prints the CRD manifests for all seeding resource types as a multi-doc
//! YAML stream, suitable for `kubectl apply -f -`.

use anyhow::Result;
use kube::CustomResourceExt;

use crds::{Cluster, Hardware, Inventory, Workflow};

fn main() -> Result<()> {
    let manifests = [
        serde_yaml::to_string(&Inventory::crd())?,
        serde_yaml::to_string(&Cluster::crd())?,
        serde_yaml::to_string(&Hardware::crd())?,
        serde_yaml::to_string(&Workflow::crd())?,
    ];

    for manifest in manifests {
        println!("---");
        print!("{manifest}");
    }

    Ok(())
}
