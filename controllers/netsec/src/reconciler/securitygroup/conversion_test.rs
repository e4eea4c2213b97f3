//! Unit tests for rule/permission conversion.

use super::conversion::{
    ingress_rules_from_permission, permission_from_ingress_rule, tags_from_api, tags_to_api,
};
use cloudsec_client::{IpPermission, IpRange, Ipv6Range, SecurityGroupPair};
use crds::{IngressRule, SecurityGroupProtocol, Tags};

#[test]
fn each_ip_range_becomes_its_own_rule() {
    let permission = IpPermission {
        ip_protocol: "tcp".to_string(),
        from_port: 6443,
        to_port: 6443,
        ip_ranges: vec![
            IpRange {
                cidr_ip: "0.0.0.0/0".to_string(),
                description: "Kubernetes API".to_string(),
            },
            IpRange {
                cidr_ip: "192.168.1.1/32".to_string(),
                description: "My VPN".to_string(),
            },
        ],
        ..Default::default()
    };

    assert_eq!(
        ingress_rules_from_permission(&permission),
        vec![
            IngressRule {
                description: "Kubernetes API".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: 6443,
                to_port: 6443,
                cidr_blocks: vec!["0.0.0.0/0".to_string()],
                ..Default::default()
            },
            IngressRule {
                description: "My VPN".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: 6443,
                to_port: 6443,
                cidr_blocks: vec!["192.168.1.1/32".to_string()],
                ..Default::default()
            },
        ]
    );
}

#[test]
fn each_group_pair_becomes_its_own_rule() {
    let permission = IpPermission {
        ip_protocol: "tcp".to_string(),
        from_port: 10250,
        to_port: 10250,
        group_pairs: vec![
            SecurityGroupPair {
                group_id: "sg-source-1".to_string(),
                description: "Kubelet API".to_string(),
            },
            SecurityGroupPair {
                group_id: "sg-source-2".to_string(),
                description: "Kubelet API".to_string(),
            },
        ],
        ..Default::default()
    };

    assert_eq!(
        ingress_rules_from_permission(&permission),
        vec![
            IngressRule {
                description: "Kubelet API".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: 10250,
                to_port: 10250,
                source_security_group_ids: vec!["sg-source-1".to_string()],
                ..Default::default()
            },
            IngressRule {
                description: "Kubelet API".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: 10250,
                to_port: 10250,
                source_security_group_ids: vec!["sg-source-2".to_string()],
                ..Default::default()
            },
        ]
    );
}

#[test]
fn mixed_sources_keep_their_own_descriptions() {
    let permission = IpPermission {
        ip_protocol: "tcp".to_string(),
        from_port: 22,
        to_port: 22,
        ip_ranges: vec![IpRange {
            cidr_ip: "0.0.0.0/0".to_string(),
            description: "MY-SSH".to_string(),
        }],
        group_pairs: vec![SecurityGroupPair {
            group_id: "sg-source-1".to_string(),
            description: "SSH".to_string(),
        }],
        ..Default::default()
    };

    assert_eq!(
        ingress_rules_from_permission(&permission),
        vec![
            IngressRule {
                description: "MY-SSH".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: 22,
                to_port: 22,
                cidr_blocks: vec!["0.0.0.0/0".to_string()],
                ..Default::default()
            },
            IngressRule {
                description: "SSH".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: 22,
                to_port: 22,
                source_security_group_ids: vec!["sg-source-1".to_string()],
                ..Default::default()
            },
        ]
    );
}

#[test]
fn ipv6_ranges_fan_out_like_ipv4_ranges() {
    let permission = IpPermission {
        ip_protocol: "tcp".to_string(),
        from_port: 6443,
        to_port: 6443,
        ipv6_ranges: vec![Ipv6Range {
            cidr_ipv6: "::/0".to_string(),
            description: "Kubernetes API IPv6".to_string(),
        }],
        ..Default::default()
    };

    let rules = ingress_rules_from_permission(&permission);
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].ipv6_cidr_blocks, vec!["::/0".to_string()]);
    assert!(rules[0].cidr_blocks.is_empty());
}

#[test]
fn unknown_protocol_falls_back_to_all() {
    let permission = IpPermission {
        ip_protocol: "gre".to_string(),
        from_port: 0,
        to_port: 0,
        ip_ranges: vec![IpRange {
            cidr_ip: "10.0.0.0/8".to_string(),
            description: String::new(),
        }],
        ..Default::default()
    };

    let rules = ingress_rules_from_permission(&permission);
    assert_eq!(rules[0].protocol, SecurityGroupProtocol::All);
}

#[test]
fn rule_description_is_carried_to_every_source() {
    let rule = IngressRule {
        description: "Kubelet API".to_string(),
        protocol: SecurityGroupProtocol::Tcp,
        from_port: 10250,
        to_port: 10250,
        source_security_group_ids: vec!["sg-1".to_string(), "sg-2".to_string()],
        ..Default::default()
    };

    let permission = permission_from_ingress_rule(&rule);
    assert_eq!(permission.ip_protocol, "tcp");
    assert_eq!(permission.group_pairs.len(), 2);
    assert!(permission
        .group_pairs
        .iter()
        .all(|p| p.description == "Kubelet API"));
    assert!(permission.ip_ranges.is_empty());
}

#[test]
fn tags_round_trip_in_key_order() {
    let mut tags = Tags::new();
    tags.insert("Name", "demo-node");
    tags.insert("kubernetes.io/cluster/demo", "owned");
    tags.insert("netops.stratoform.io/role", "node");

    let api_tags = tags_to_api(&tags);
    let keys: Vec<&str> = api_tags.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "Name",
            "kubernetes.io/cluster/demo",
            "netops.stratoform.io/role",
        ]
    );

    assert_eq!(tags_from_api(&api_tags), tags);
}
