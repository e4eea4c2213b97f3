//! Test utilities for unit testing the security-group engine.
//!
//! Builders for topology snapshots and scopes used across the engine test
//! modules.

use crate::scope::ClusterScope;
use crds::{
    ClusterNetworkStatus, NetworkSpec, SecurityGroupRole, SubnetSpec, Tags, VpcSpec,
};
use std::collections::BTreeMap;

/// Cluster name used by all engine tests.
pub const TEST_CLUSTER: &str = "test-cluster";

/// A two-subnet network in the given VPC, mirroring a typical
/// public/private topology.
pub fn test_network(vpc_id: &str) -> NetworkSpec {
    NetworkSpec {
        vpc: VpcSpec {
            id: vpc_id.to_string(),
            internet_gateway_id: Some("igw-01".to_string()),
            ..Default::default()
        },
        subnets: vec![
            SubnetSpec {
                id: "subnet-securitygroups-private".to_string(),
                availability_zone: "us-east-1a".to_string(),
                is_public: false,
                nat_gateway_id: None,
            },
            SubnetSpec {
                id: "subnet-securitygroups-public".to_string(),
                availability_zone: "us-east-1a".to_string(),
                is_public: true,
                nat_gateway_id: Some("nat-01".to_string()),
            },
        ],
        ..Default::default()
    }
}

/// A scope for [`TEST_CLUSTER`] over the given network, with empty status.
pub fn test_scope(network: NetworkSpec) -> ClusterScope {
    ClusterScope {
        cluster_name: TEST_CLUSTER.to_string(),
        network,
        control_plane_load_balancer: None,
        additional_tags: Tags::new(),
        status: ClusterNetworkStatus::default(),
    }
}

/// Override IDs for every role, matching the fixture group IDs used by the
/// reconcile tests.
pub fn all_overrides() -> BTreeMap<SecurityGroupRole, String> {
    BTreeMap::from([
        (SecurityGroupRole::Bastion, "sg-bastion".to_string()),
        (SecurityGroupRole::ApiServerLb, "sg-apiserver-lb".to_string()),
        (SecurityGroupRole::Lb, "sg-lb".to_string()),
        (SecurityGroupRole::ControlPlane, "sg-control".to_string()),
        (SecurityGroupRole::Node, "sg-node".to_string()),
    ])
}
