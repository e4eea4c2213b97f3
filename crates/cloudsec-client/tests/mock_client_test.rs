//! Integration tests for the in-memory mock client.
//!
//! Run with `cargo test --features test-util`.

#![cfg(feature = "test-util")]

use cloudsec_client::{
    CloudSecClientTrait, CreateSecurityGroupRequest, Filter, IpPermission, MockCloudSecClient,
    SecurityGroup, SecurityGroupPair, Tag,
};

fn owned_tag(cluster: &str) -> Tag {
    Tag {
        key: format!("netops.stratoform.io/cluster/{cluster}"),
        value: "owned".to_string(),
    }
}

#[tokio::test]
async fn create_assigns_sequential_ids_and_lists_by_vpc() {
    let client = MockCloudSecClient::new("http://mock");

    let id = client
        .create_security_group(CreateSecurityGroupRequest {
            vpc_id: "vpc-1".to_string(),
            group_name: "demo-node".to_string(),
            description: "Kubernetes cluster demo: node".to_string(),
            tags: vec![owned_tag("demo")],
        })
        .await
        .unwrap();
    assert_eq!(id, "sg-1");

    client
        .create_security_group(CreateSecurityGroupRequest {
            vpc_id: "vpc-2".to_string(),
            group_name: "other".to_string(),
            description: String::new(),
            tags: vec![],
        })
        .await
        .unwrap();

    let groups = client
        .list_security_groups("vpc-1", &[], false)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].group_name, "demo-node");
}

#[tokio::test]
async fn duplicate_name_in_same_vpc_is_rejected() {
    let client = MockCloudSecClient::new("http://mock");
    let request = CreateSecurityGroupRequest {
        vpc_id: "vpc-1".to_string(),
        group_name: "demo-node".to_string(),
        description: String::new(),
        tags: vec![],
    };
    client.create_security_group(request.clone()).await.unwrap();
    let err = client.create_security_group(request).await.unwrap_err();
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn tag_filters_narrow_listing() {
    let client = MockCloudSecClient::new("http://mock");
    client.add_security_group(SecurityGroup {
        group_id: "sg-owned".to_string(),
        group_name: "demo-bastion".to_string(),
        vpc_id: "vpc-1".to_string(),
        tags: vec![owned_tag("demo")],
        ..Default::default()
    });
    client.add_security_group(SecurityGroup {
        group_id: "sg-foreign".to_string(),
        group_name: "unrelated".to_string(),
        vpc_id: "vpc-1".to_string(),
        ..Default::default()
    });

    let filters = vec![Filter::tag("netops.stratoform.io/cluster/demo", "owned")];
    let owned = client
        .list_security_groups("vpc-1", &filters, true)
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].group_id, "sg-owned");
}

#[tokio::test]
async fn delete_refuses_while_group_is_referenced() {
    let client = MockCloudSecClient::new("http://mock");
    client.add_security_group(SecurityGroup {
        group_id: "sg-a".to_string(),
        group_name: "a".to_string(),
        vpc_id: "vpc-1".to_string(),
        ..Default::default()
    });
    let referencing_permission = IpPermission {
        ip_protocol: "tcp".to_string(),
        from_port: 10250,
        to_port: 10250,
        group_pairs: vec![SecurityGroupPair {
            group_id: "sg-a".to_string(),
            description: "Kubelet API".to_string(),
        }],
        ..Default::default()
    };
    client.add_security_group(SecurityGroup {
        group_id: "sg-b".to_string(),
        group_name: "b".to_string(),
        vpc_id: "vpc-1".to_string(),
        ip_permissions: vec![referencing_permission.clone()],
        ..Default::default()
    });

    let err = client.delete_security_group("sg-a").await.unwrap_err();
    assert!(err.is_failed_dependency());

    // Revoking the referencing rule unblocks the delete.
    client
        .revoke_security_group_ingress("sg-b", &[referencing_permission])
        .await
        .unwrap();
    client.delete_security_group("sg-a").await.unwrap();
    assert!(client.group("sg-a").is_none());
}

#[tokio::test]
async fn injected_failures_surface_and_calls_are_recorded() {
    let client = MockCloudSecClient::new("http://mock");
    client.fail_on("list:vpc-1", "listing unavailable");

    let err = client
        .list_security_groups("vpc-1", &[], true)
        .await
        .unwrap_err();
    assert!(err.is_failed_dependency());
    assert_eq!(client.calls(), vec!["list:vpc-1".to_string()]);
}
