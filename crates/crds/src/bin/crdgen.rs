//! Prints the ClusterNetwork CRD manifest as YAML.

use crds::ClusterNetwork;
use kube::CustomResourceExt;

fn main() -> Result<(), serde_yaml::Error> {
    print!("{}", serde_yaml::to_string(&ClusterNetwork::crd())?);
    Ok(())
}
