//! Conversion between engine rule types and provider API types.

use cloudsec_client::{IpPermission, IpRange, Ipv6Range, SecurityGroupPair, Tag};
use crds::{IngressRule, SecurityGroupProtocol, Tags};
use tracing::debug;

/// Converts one ingress rule into a provider permission.
pub(crate) fn permission_from_ingress_rule(rule: &IngressRule) -> IpPermission {
    IpPermission {
        ip_protocol: rule.protocol.as_str().to_string(),
        from_port: rule.from_port,
        to_port: rule.to_port,
        ip_ranges: rule
            .cidr_blocks
            .iter()
            .map(|cidr| IpRange {
                cidr_ip: cidr.clone(),
                description: rule.description.clone(),
            })
            .collect(),
        ipv6_ranges: rule
            .ipv6_cidr_blocks
            .iter()
            .map(|cidr| Ipv6Range {
                cidr_ipv6: cidr.clone(),
                description: rule.description.clone(),
            })
            .collect(),
        group_pairs: rule
            .source_security_group_ids
            .iter()
            .map(|id| SecurityGroupPair {
                group_id: id.clone(),
                description: rule.description.clone(),
            })
            .collect(),
    }
}

/// Converts a derived rule batch for one authorize call.
pub(crate) fn permissions_from_ingress_rules(rules: &[IngressRule]) -> Vec<IpPermission> {
    rules.iter().map(permission_from_ingress_rule).collect()
}

/// Fans a provider permission out into engine rules.
///
/// Each IPv4 range, IPv6 range and peer-group pair becomes its own rule
/// carrying its own description; differently described sources are never
/// merged into one rule.
pub(crate) fn ingress_rules_from_permission(permission: &IpPermission) -> Vec<IngressRule> {
    let protocol = match SecurityGroupProtocol::parse(&permission.ip_protocol) {
        Some(p) => p,
        None => {
            debug!(
                "Unknown protocol {:?} on discovered permission, treating as all-protocols",
                permission.ip_protocol
            );
            SecurityGroupProtocol::All
        }
    };
    let base = IngressRule {
        protocol,
        from_port: permission.from_port,
        to_port: permission.to_port,
        ..Default::default()
    };

    let mut rules = Vec::new();
    for range in &permission.ip_ranges {
        rules.push(IngressRule {
            description: range.description.clone(),
            cidr_blocks: vec![range.cidr_ip.clone()],
            ..base.clone()
        });
    }
    for range in &permission.ipv6_ranges {
        rules.push(IngressRule {
            description: range.description.clone(),
            ipv6_cidr_blocks: vec![range.cidr_ipv6.clone()],
            ..base.clone()
        });
    }
    for pair in &permission.group_pairs {
        rules.push(IngressRule {
            description: pair.description.clone(),
            source_security_group_ids: vec![pair.group_id.clone()],
            ..base.clone()
        });
    }
    rules
}

/// Converts a tag set into provider tag pairs, in key order.
pub(crate) fn tags_to_api(tags: &Tags) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Converts provider tag pairs back into a tag set.
pub(crate) fn tags_from_api(tags: &[Tag]) -> Tags {
    tags.iter()
        .map(|t| (t.key.clone(), t.value.clone()))
        .collect()
}
