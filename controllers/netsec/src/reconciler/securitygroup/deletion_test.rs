//! Unit tests for the two-phase deletion engine.

use super::SecurityGroupService;
use crate::error::ControllerError;
use crate::scope::ClusterScope;
use crate::test_utils::{all_overrides, test_network, test_scope, TEST_CLUSTER};
use cloudsec_client::{
    IpPermission, MockCloudSecClient, SecurityGroup, SecurityGroupPair, Tag,
};
use crds::tags::{cluster_tag_key, TAG_VALUE_OWNED};
use crds::{NetworkSpec, SecurityGroupRole};

async fn delete_all(
    scope: &mut ClusterScope,
    client: &MockCloudSecClient,
) -> Result<(), ControllerError> {
    SecurityGroupService::new(scope, &SecurityGroupRole::ORDERED, client)
        .delete_all()
        .await
}

fn owned_group(id: &str, name: &str, permissions: Vec<IpPermission>) -> SecurityGroup {
    SecurityGroup {
        group_id: id.to_string(),
        group_name: name.to_string(),
        vpc_id: "vpc-id".to_string(),
        tags: vec![Tag {
            key: cluster_tag_key(TEST_CLUSTER),
            value: TAG_VALUE_OWNED.to_string(),
        }],
        ip_permissions: permissions,
        ..Default::default()
    }
}

fn peer_permission(peer_id: &str) -> IpPermission {
    IpPermission {
        ip_protocol: "tcp".to_string(),
        from_port: 10250,
        to_port: 10250,
        group_pairs: vec![SecurityGroupPair {
            group_id: peer_id.to_string(),
            description: "Kubelet API".to_string(),
        }],
        ..Default::default()
    }
}

#[tokio::test]
async fn noop_when_vpc_id_is_absent() {
    let client = MockCloudSecClient::new("http://mock");
    let mut scope = test_scope(NetworkSpec::default());

    delete_all(&mut scope, &client).await.unwrap();

    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn override_groups_are_never_revoked_or_deleted() {
    let client = MockCloudSecClient::new("http://mock");
    // Override groups exist but carry no ownership tag, so the owned-tag
    // listing returns nothing.
    client.add_security_group(SecurityGroup {
        group_id: "sg-bastion".to_string(),
        group_name: "Bastion Security Group".to_string(),
        vpc_id: "vpc-id".to_string(),
        ..Default::default()
    });
    let mut network = test_network("vpc-id");
    network.security_group_overrides = all_overrides();
    let mut scope = test_scope(network);

    delete_all(&mut scope, &client).await.unwrap();

    assert_eq!(client.calls(), vec!["list:vpc-id"]);
    assert!(client.group("sg-bastion").is_some());
}

#[tokio::test]
async fn revokes_every_group_before_deleting_any() {
    let client = MockCloudSecClient::new("http://mock");
    // Two owned groups referencing each other: deleting either before both
    // revocations would fail with a dependency error in the mock, exactly
    // like the provider.
    client.add_security_group(owned_group(
        "sg-a",
        "test-cluster-controlplane",
        vec![peer_permission("sg-b")],
    ));
    client.add_security_group(owned_group(
        "sg-b",
        "test-cluster-node",
        vec![peer_permission("sg-a")],
    ));
    let mut scope = test_scope(test_network("vpc-id"));

    delete_all(&mut scope, &client).await.unwrap();

    assert_eq!(
        client.calls(),
        vec![
            "list:vpc-id",
            "describe",
            "revoke:sg-a",
            "revoke:sg-b",
            "delete:sg-a",
            "delete:sg-b",
        ]
    );
    assert_eq!(client.group_count(), 0);
}

#[tokio::test]
async fn group_without_permissions_is_deleted_without_revocation() {
    let client = MockCloudSecClient::new("http://mock");
    client.add_security_group(owned_group("sg-a", "test-cluster-lb", vec![]));
    let mut scope = test_scope(test_network("vpc-id"));

    delete_all(&mut scope, &client).await.unwrap();

    assert_eq!(client.calls(), vec!["list:vpc-id", "describe", "delete:sg-a"]);
}

#[tokio::test]
async fn revoke_failure_aborts_before_any_delete() {
    let client = MockCloudSecClient::new("http://mock");
    client.add_security_group(owned_group(
        "sg-a",
        "test-cluster-controlplane",
        vec![peer_permission("sg-b")],
    ));
    client.add_security_group(owned_group(
        "sg-b",
        "test-cluster-node",
        vec![peer_permission("sg-a")],
    ));
    client.fail_on("revoke:sg-a", "revocation failed");
    let mut scope = test_scope(test_network("vpc-id"));

    let err = delete_all(&mut scope, &client).await.unwrap_err();
    match err {
        ControllerError::Deletion { cluster, group, .. } => {
            assert_eq!(cluster, TEST_CLUSTER);
            assert_eq!(group, "sg-a");
        }
        other => panic!("expected Deletion error, got {other:?}"),
    }
    assert!(!client.calls().iter().any(|c| c.starts_with("delete:")));
    assert_eq!(client.group_count(), 2);
}

#[tokio::test]
async fn delete_failure_aborts_remaining_groups() {
    let client = MockCloudSecClient::new("http://mock");
    client.add_security_group(owned_group("sg-a", "test-cluster-lb", vec![]));
    client.add_security_group(owned_group("sg-b", "test-cluster-node", vec![]));
    client.fail_on("delete:sg-a", "deletion failed");
    let mut scope = test_scope(test_network("vpc-id"));

    let err = delete_all(&mut scope, &client).await.unwrap_err();
    assert!(matches!(err, ControllerError::Deletion { .. }));
    assert!(!client.calls().iter().any(|c| c == "delete:sg-b"));
    assert!(client.group("sg-b").is_some());
}

#[tokio::test]
async fn listing_failure_is_fatal() {
    let client = MockCloudSecClient::new("http://mock");
    client.fail_on("list:vpc-id", "dependency-failure");
    let mut scope = test_scope(test_network("vpc-id"));

    let err = delete_all(&mut scope, &client).await.unwrap_err();
    match err {
        ControllerError::Discovery { cluster, source } => {
            assert_eq!(cluster, TEST_CLUSTER);
            assert!(source.is_failed_dependency());
        }
        other => panic!("expected Discovery error, got {other:?}"),
    }
}

#[tokio::test]
async fn describe_failure_is_fatal() {
    let client = MockCloudSecClient::new("http://mock");
    client.add_security_group(owned_group("sg-a", "test-cluster-lb", vec![]));
    client.fail_on("describe", "dependency-failure");
    let mut scope = test_scope(test_network("vpc-id"));

    let err = delete_all(&mut scope, &client).await.unwrap_err();
    assert!(matches!(err, ControllerError::Discovery { .. }));
    assert!(!client.calls().iter().any(|c| c.starts_with("delete:")));
}

#[tokio::test]
async fn recorded_groups_are_cleared_after_teardown() {
    let client = MockCloudSecClient::new("http://mock");
    client.add_security_group(owned_group("sg-a", "test-cluster-lb", vec![]));
    let mut scope = test_scope(test_network("vpc-id"));
    scope.record_security_group(SecurityGroupRole::Lb, "sg-a", "test-cluster-lb");

    delete_all(&mut scope, &client).await.unwrap();

    assert!(scope.status.security_groups.is_empty());
}
