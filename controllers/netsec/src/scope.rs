//! Per-cluster reconciliation scope.
//!
//! A `ClusterScope` is the read-only topology snapshot plus the
//! `ClusterNetworkStatus` being built up during a single reconcile or
//! delete pass. It is constructed from a `ClusterNetwork` object and its
//! status is written back by the reconciler once the pass finishes.

use crds::{
    ClusterNetwork, ClusterNetworkStatus, LoadBalancerSpec, NetworkSpec, SecurityGroupRef,
    SecurityGroupRole, Tags, VpcSpec,
};
use std::collections::BTreeMap;

/// Snapshot of one cluster's network topology and in-pass status.
#[derive(Debug, Clone)]
pub struct ClusterScope {
    /// Name of the cluster, used for naming and ownership tagging.
    pub cluster_name: String,
    /// Desired network topology.
    pub network: NetworkSpec,
    /// Control-plane load balancer configuration, if any.
    pub control_plane_load_balancer: Option<LoadBalancerSpec>,
    /// Cluster-level additional tags.
    pub additional_tags: Tags,
    /// Status being built during this pass.
    pub status: ClusterNetworkStatus,
}

impl ClusterScope {
    /// Builds a scope from a `ClusterNetwork` object, carrying over any
    /// previously recorded status.
    #[must_use]
    pub fn from_cluster_network(cn: &ClusterNetwork) -> Self {
        Self {
            cluster_name: cn.spec.cluster_name.clone(),
            network: cn.spec.network.clone(),
            control_plane_load_balancer: cn.spec.control_plane_load_balancer.clone(),
            additional_tags: cn.spec.additional_tags.clone(),
            status: cn.status.clone().unwrap_or_default(),
        }
    }

    /// The cluster VPC.
    #[must_use]
    pub fn vpc(&self) -> &VpcSpec {
        &self.network.vpc
    }

    /// Per-role override map.
    #[must_use]
    pub fn security_group_overrides(&self) -> &BTreeMap<SecurityGroupRole, String> {
        &self.network.security_group_overrides
    }

    /// Control-plane load balancer spec, if one is configured.
    #[must_use]
    pub fn control_plane_load_balancer(&self) -> Option<&LoadBalancerSpec> {
        self.control_plane_load_balancer.as_ref()
    }

    /// NAT gateway egress IPs discovered by the lifecycle controller.
    #[must_use]
    pub fn nat_gateway_ips(&self) -> &[String] {
        &self.status.nat_gateways_ips
    }

    /// Records a resolved group for a role in status.
    pub fn record_security_group(
        &mut self,
        role: SecurityGroupRole,
        id: impl Into<String>,
        name: impl Into<String>,
    ) {
        self.status.security_groups.insert(
            role,
            SecurityGroupRef {
                id: id.into(),
                name: name.into(),
            },
        );
    }

    /// Resolved group ID for a role, if recorded.
    #[must_use]
    pub fn security_group_id(&self, role: SecurityGroupRole) -> Option<&str> {
        self.status
            .security_groups
            .get(&role)
            .map(|sg| sg.id.as_str())
    }
}
