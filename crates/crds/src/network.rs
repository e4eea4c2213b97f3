//! Network topology types consumed by the security-group engine.

use crate::ingress::{IngressRule, SecurityGroupRole};
use crate::tags::Tags;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// IPv6 configuration of a VPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6Spec {
    /// IPv6 CIDR block assigned to the VPC.
    #[serde(default)]
    pub cidr_block: String,
}

/// VPC the cluster's security groups live in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VpcSpec {
    /// Provider-assigned VPC ID.
    #[serde(default)]
    pub id: String,

    /// IPv4 CIDR block of the VPC.
    #[serde(default)]
    pub cidr_block: String,

    /// IPv6 configuration; absence means an IPv4-only VPC.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<Ipv6Spec>,

    /// Internet gateway attached to the VPC, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internet_gateway_id: Option<String>,

    /// Tags on the VPC itself.
    #[serde(default)]
    pub tags: Tags,
}

impl VpcSpec {
    /// True when this controller created the VPC and owns its lifecycle.
    #[must_use]
    pub fn is_managed(&self, cluster_name: &str) -> bool {
        !self.id.is_empty() && self.tags.has_owned(cluster_name)
    }

    /// True when the VPC is configured for IPv6.
    #[must_use]
    pub fn is_ipv6_enabled(&self) -> bool {
        self.ipv6.is_some()
    }
}

/// One subnet of the cluster VPC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubnetSpec {
    /// Provider-assigned subnet ID.
    pub id: String,

    /// Availability zone the subnet is placed in.
    #[serde(default)]
    pub availability_zone: String,

    /// Whether the subnet routes to an internet gateway.
    #[serde(default)]
    pub is_public: bool,

    /// NAT gateway serving the subnet, if one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nat_gateway_id: Option<String>,
}

/// Scheme of the control-plane load balancer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum LoadBalancerScheme {
    /// Reachable from the internet.
    #[default]
    #[serde(rename = "internet-facing")]
    InternetFacing,
    /// Reachable only from within the VPC.
    #[serde(rename = "internal")]
    Internal,
}

/// Kind of load balancer fronting the API server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LoadBalancerType {
    /// Classic load balancer.
    #[default]
    Classic,
    /// Network load balancer.
    Nlb,
    /// Application load balancer.
    Alb,
}

/// Control-plane load balancer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerSpec {
    /// Load balancer scheme; defaults to internet-facing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<LoadBalancerScheme>,

    /// Load balancer kind.
    #[serde(default)]
    pub load_balancer_type: LoadBalancerType,

    /// Explicit ingress rules for the API-server group. When set, these
    /// replace the synthesized catch-all rule (source-scoped rules still
    /// precede them).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingress_rules: Vec<IngressRule>,
}

impl LoadBalancerSpec {
    /// True when the load balancer is internal-scheme.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.scheme == Some(LoadBalancerScheme::Internal)
    }
}

/// Declarative network posture of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpec {
    /// VPC the cluster runs in.
    #[serde(default)]
    pub vpc: VpcSpec,

    /// Ordered subnet list.
    #[serde(default)]
    pub subnets: Vec<SubnetSpec>,

    /// Pre-existing, externally owned groups to use instead of managed
    /// ones, per role. The engine never creates, tags or deletes these.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub security_group_overrides: BTreeMap<SecurityGroupRole, String>,

    /// Extra ingress rules attached to the control-plane group, passed
    /// through peer-group resolution.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_control_plane_ingress_rules: Vec<IngressRule>,
}
