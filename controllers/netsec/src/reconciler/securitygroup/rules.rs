//! Per-role ingress rule derivation.
//!
//! Pure functions from the cluster topology snapshot to each role's rule
//! list. Peer-group references by role are resolved against the group IDs
//! already recorded in status, so role order matters.

use super::{SecurityGroupService, ANY_IPV4_CIDR_BLOCK, ANY_IPV6_CIDR_BLOCK};
use crds::{IngressRule, LoadBalancerSpec, SecurityGroupProtocol, SecurityGroupRole};
use tracing::debug;

const KUBE_API_PORT: i64 = 6443;
const KUBELET_PORT: i64 = 10250;
const SSH_PORT: i64 = 22;

fn kubernetes_api_rule(cidr_blocks: Vec<String>) -> IngressRule {
    IngressRule {
        description: "Kubernetes API".to_string(),
        protocol: SecurityGroupProtocol::Tcp,
        from_port: KUBE_API_PORT,
        to_port: KUBE_API_PORT,
        cidr_blocks,
        ..Default::default()
    }
}

fn kubernetes_api_rule_ipv6(ipv6_cidr_blocks: Vec<String>) -> IngressRule {
    IngressRule {
        description: "Kubernetes API IPv6".to_string(),
        protocol: SecurityGroupProtocol::Tcp,
        from_port: KUBE_API_PORT,
        to_port: KUBE_API_PORT,
        ipv6_cidr_blocks,
        ..Default::default()
    }
}

impl SecurityGroupService<'_> {
    /// Derives the ingress rule list for a role.
    pub(crate) fn security_group_ingress_rules(&self, role: SecurityGroupRole) -> Vec<IngressRule> {
        match role {
            SecurityGroupRole::Bastion => vec![IngressRule {
                description: "SSH".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: SSH_PORT,
                to_port: SSH_PORT,
                cidr_blocks: vec![ANY_IPV4_CIDR_BLOCK.to_string()],
                ..Default::default()
            }],
            SecurityGroupRole::ApiServerLb => self.api_server_lb_ingress_rules(),
            // Generic LB wiring manages its own listener rules.
            SecurityGroupRole::Lb => Vec::new(),
            SecurityGroupRole::ControlPlane => self.resolve_security_group_sources(
                self.scope
                    .network
                    .additional_control_plane_ingress_rules
                    .clone(),
            ),
            SecurityGroupRole::Node => self.node_ingress_rules(),
        }
    }

    /// Rules for the API-server load balancer group.
    ///
    /// Source-scoped entries come first: the VPC CIDR for an internal
    /// scheme, or one `/32` per NAT gateway egress IP otherwise. Explicit
    /// rules on the load-balancer spec then replace the catch-all default;
    /// without them exactly one catch-all entry is appended. Note that an
    /// internal scheme does not suppress the catch-all.
    fn api_server_lb_ingress_rules(&self) -> Vec<IngressRule> {
        let vpc = self.scope.vpc();
        let ipv6 = vpc.is_ipv6_enabled();
        let lb = self.scope.control_plane_load_balancer();
        let mut rules = Vec::new();

        if lb.is_some_and(LoadBalancerSpec::is_internal) {
            if ipv6 {
                let cidr = vpc
                    .ipv6
                    .as_ref()
                    .map(|v| v.cidr_block.as_str())
                    .unwrap_or_default();
                if !cidr.is_empty() {
                    rules.push(kubernetes_api_rule_ipv6(vec![cidr.to_string()]));
                }
            } else if !vpc.cidr_block.is_empty() {
                rules.push(kubernetes_api_rule(vec![vpc.cidr_block.clone()]));
            }
        } else {
            for ip in self.scope.nat_gateway_ips() {
                rules.push(kubernetes_api_rule(vec![format!("{ip}/32")]));
            }
        }

        let explicit = lb.map(|l| l.ingress_rules.clone()).unwrap_or_default();
        if explicit.is_empty() {
            rules.push(if ipv6 {
                kubernetes_api_rule_ipv6(vec![ANY_IPV6_CIDR_BLOCK.to_string()])
            } else {
                kubernetes_api_rule(vec![ANY_IPV4_CIDR_BLOCK.to_string()])
            });
        } else {
            rules.extend(explicit);
        }

        rules
    }

    /// Fixed node rules, peer-resolved against the recorded group IDs.
    fn node_ingress_rules(&self) -> Vec<IngressRule> {
        self.resolve_security_group_sources(vec![
            IngressRule {
                description: "Kubelet API".to_string(),
                protocol: SecurityGroupProtocol::Tcp,
                from_port: KUBELET_PORT,
                to_port: KUBELET_PORT,
                source_security_group_roles: vec![
                    SecurityGroupRole::ControlPlane,
                    SecurityGroupRole::Node,
                ],
                ..Default::default()
            },
            IngressRule {
                description: "Node-to-node traffic".to_string(),
                protocol: SecurityGroupProtocol::All,
                from_port: -1,
                to_port: -1,
                source_security_group_roles: vec![SecurityGroupRole::Node],
                ..Default::default()
            },
        ])
    }

    /// Resolves peer-group references on a rule list.
    ///
    /// CIDR sources suppress resolution entirely. A rule with no sources at
    /// all is scoped to the control-plane group. Otherwise role references
    /// append their recorded IDs after any explicit IDs, in rule order;
    /// the role list never survives into the output.
    pub(crate) fn resolve_security_group_sources(
        &self,
        rules: Vec<IngressRule>,
    ) -> Vec<IngressRule> {
        rules
            .into_iter()
            .map(|mut rule| {
                if !rule.cidr_blocks.is_empty() || !rule.ipv6_cidr_blocks.is_empty() {
                    rule.source_security_group_roles.clear();
                    return rule;
                }

                if rule.source_security_group_ids.is_empty()
                    && rule.source_security_group_roles.is_empty()
                {
                    if let Some(id) = self.scope.security_group_id(SecurityGroupRole::ControlPlane)
                    {
                        rule.source_security_group_ids.push(id.to_string());
                    }
                    return rule;
                }

                let roles = std::mem::take(&mut rule.source_security_group_roles);
                for role in roles {
                    match self.scope.security_group_id(role) {
                        Some(id) => rule.source_security_group_ids.push(id.to_string()),
                        None => debug!(
                            "No security group recorded for role {}, skipping peer resolution",
                            role
                        ),
                    }
                }
                rule
            })
            .collect()
    }
}
