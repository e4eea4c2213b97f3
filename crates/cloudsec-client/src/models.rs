//! Firewall-group API models
//!
//! These models match the provider's security-group resource shapes. A
//! group's ingress permissions are the provider-side aggregate form: one
//! permission per protocol/port range, fanning out into per-source entries.

use serde::{Deserialize, Serialize};

/// API response wrapper for paginated group listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupPage {
    /// Opaque continuation token, absent on the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    /// Groups on this page.
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
}

/// A firewall group as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    /// Provider-assigned group ID.
    pub group_id: String,
    /// Group name, unique within a VPC.
    pub group_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// VPC the group belongs to.
    #[serde(default)]
    pub vpc_id: String,
    /// Tags on the group.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Current ingress permission set.
    #[serde(default)]
    pub ip_permissions: Vec<IpPermission>,
}

impl SecurityGroup {
    /// Looks up a tag value by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }
}

/// A single key/value resource tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

/// One ingress permission: protocol + port range + allowed sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpPermission {
    /// Protocol in provider form ("tcp", "udp", "icmp", "icmpv6", "-1").
    pub ip_protocol: String,
    /// First port of the range.
    #[serde(default)]
    pub from_port: i64,
    /// Last port of the range.
    #[serde(default)]
    pub to_port: i64,
    /// Allowed IPv4 source ranges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_ranges: Vec<IpRange>,
    /// Allowed IPv6 source ranges.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6_ranges: Vec<Ipv6Range>,
    /// Allowed peer security groups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_pairs: Vec<SecurityGroupPair>,
}

/// An IPv4 source range with its own description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRange {
    /// IPv4 CIDR block.
    pub cidr_ip: String,
    /// Description of this specific source.
    #[serde(default)]
    pub description: String,
}

/// An IPv6 source range with its own description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipv6Range {
    /// IPv6 CIDR block.
    pub cidr_ipv6: String,
    /// Description of this specific source.
    #[serde(default)]
    pub description: String,
}

/// A peer-group source with its own description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupPair {
    /// Provider ID of the peer group.
    pub group_id: String,
    /// Description of this specific source.
    #[serde(default)]
    pub description: String,
}

/// Server-side filter applied to group listings.
///
/// Filter names follow the provider convention: `group-name`, `group-id`,
/// or `tag:<key>` with the tag value as the filter value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    /// Filter name.
    pub name: String,
    /// Accepted values (OR semantics).
    pub values: Vec<String>,
}

impl Filter {
    /// Builds a filter from a name and a single value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Builds a `tag:<key>` filter matching one tag value.
    #[must_use]
    pub fn tag(key: &str, value: impl Into<String>) -> Self {
        Self::new(format!("tag:{key}"), value)
    }
}

/// Request body for creating a security group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityGroupRequest {
    /// Target VPC.
    pub vpc_id: String,
    /// Group name.
    pub group_name: String,
    /// Free-form description.
    pub description: String,
    /// Tags applied at creation time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// Response body of a create-group call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityGroupResponse {
    /// ID assigned by the provider.
    pub group_id: String,
}
