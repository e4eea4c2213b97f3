//! Security group roles and ingress rule types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical purpose of a cluster security group.
///
/// The set of roles is closed; processing order is supplied by the caller.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum SecurityGroupRole {
    /// SSH jump host.
    #[serde(rename = "bastion")]
    Bastion,
    /// Load balancer fronting the Kubernetes API server.
    #[serde(rename = "apiserver-lb")]
    ApiServerLb,
    /// Generic service load balancers.
    #[serde(rename = "lb")]
    Lb,
    /// Control plane machines.
    #[serde(rename = "controlplane")]
    ControlPlane,
    /// Worker machines.
    #[serde(rename = "node")]
    Node,
}

impl SecurityGroupRole {
    /// Canonical processing order used by the controller.
    pub const ORDERED: [Self; 5] = [
        Self::Bastion,
        Self::ApiServerLb,
        Self::Lb,
        Self::ControlPlane,
        Self::Node,
    ];

    /// Suffix used in group names, descriptions and the role tag.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Bastion => "bastion",
            Self::ApiServerLb => "apiserver-lb",
            Self::Lb => "lb",
            Self::ControlPlane => "controlplane",
            Self::Node => "node",
        }
    }
}

impl fmt::Display for SecurityGroupRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Network protocol selector for an ingress rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SecurityGroupProtocol {
    /// TCP.
    #[serde(rename = "tcp")]
    Tcp,
    /// UDP.
    #[serde(rename = "udp")]
    Udp,
    /// ICMP.
    #[serde(rename = "icmp")]
    Icmp,
    /// ICMPv6.
    #[serde(rename = "icmpv6")]
    Icmpv6,
    /// All protocols (provider wildcard).
    #[serde(rename = "-1")]
    All,
}

impl SecurityGroupProtocol {
    /// Provider wire representation of the protocol.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Icmp => "icmp",
            Self::Icmpv6 => "icmpv6",
            Self::All => "-1",
        }
    }

    /// Parses the provider wire representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tcp" => Some(Self::Tcp),
            "udp" => Some(Self::Udp),
            "icmp" => Some(Self::Icmp),
            "icmpv6" => Some(Self::Icmpv6),
            "-1" => Some(Self::All),
            _ => None,
        }
    }
}

impl fmt::Display for SecurityGroupProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One firewall permission entry: protocol, port range and allowed sources.
///
/// A rule allows either CIDR sources or peer-group sources, not both.
/// `source_security_group_roles` is an input convenience only: resolution
/// replaces it with concrete IDs before a rule is sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    /// Human-readable purpose, carried onto the provider rule.
    #[serde(default)]
    pub description: String,

    /// Protocol the rule applies to.
    pub protocol: SecurityGroupProtocol,

    /// First port of the allowed range.
    pub from_port: i64,

    /// Last port of the allowed range.
    pub to_port: i64,

    /// Allowed IPv4 source blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cidr_blocks: Vec<String>,

    /// Allowed IPv6 source blocks.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6_cidr_blocks: Vec<String>,

    /// Allowed peer security groups by provider ID.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_security_group_ids: Vec<String>,

    /// Allowed peer security groups by cluster role, resolved to IDs
    /// before the rule becomes final.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_security_group_roles: Vec<SecurityGroupRole>,
}

impl Default for IngressRule {
    fn default() -> Self {
        Self {
            description: String::new(),
            protocol: SecurityGroupProtocol::Tcp,
            from_port: 0,
            to_port: 0,
            cidr_blocks: Vec::new(),
            ipv6_cidr_blocks: Vec::new(),
            source_security_group_ids: Vec::new(),
            source_security_group_roles: Vec::new(),
        }
    }
}
