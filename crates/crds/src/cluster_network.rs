//! ClusterNetwork CRD
//!
//! Declares a cluster's desired network-security posture and records the
//! resolved cloud state in its status subresource.

use crate::ingress::SecurityGroupRole;
use crate::network::{LoadBalancerSpec, NetworkSpec};
use crate::tags::Tags;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "netops.stratoform.io",
    version = "v1alpha1",
    kind = "ClusterNetwork",
    namespaced,
    status = "ClusterNetworkStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkSpec {
    /// Name of the cluster this network posture belongs to. Used for group
    /// naming and ownership tagging.
    pub cluster_name: String,

    /// Desired network topology and security-group configuration.
    #[serde(default)]
    pub network: NetworkSpec,

    /// Control-plane load balancer configuration, if one is provisioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_load_balancer: Option<LoadBalancerSpec>,

    /// Extra tags declared on the cluster. Only consulted for the legacy
    /// cloud-provider key on the generic LB group.
    #[serde(default)]
    pub additional_tags: Tags,
}

/// A resolved security group recorded in status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupRef {
    /// Provider-assigned group ID.
    pub id: String,

    /// Group name, empty for override groups that were not found in the
    /// discovery listing.
    #[serde(default)]
    pub name: String,
}

/// Coarse reconciliation state of the cluster network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum NetworkState {
    /// Not yet reconciled.
    #[default]
    Pending,
    /// All security groups resolved and converged.
    Provisioned,
    /// Last reconciliation failed; see `failure_message`.
    Failed,
}

/// Observed/derived network-security state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterNetworkStatus {
    /// Resolved security group per role, populated from overrides or from
    /// creation results.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub security_groups: BTreeMap<SecurityGroupRole, SecurityGroupRef>,

    /// Egress IPs of the cluster's NAT gateways, discovered by the
    /// surrounding lifecycle controller.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nat_gateways_ips: Vec<String>,

    /// Reconciliation state.
    #[serde(default)]
    pub state: NetworkState,

    /// Message of the last failure, cleared on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}
