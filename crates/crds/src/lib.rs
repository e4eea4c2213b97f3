//! CRD definitions and shared types
//!
//! Kubernetes Custom Resource Definitions and the value types shared by the
//! network-security controllers.

pub mod cluster_network;
pub mod ingress;
pub mod network;
pub mod tags;

pub use cluster_network::*;
pub use ingress::*;
pub use network::*;
pub use tags::*;
