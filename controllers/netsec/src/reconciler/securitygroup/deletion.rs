//! Two-phase teardown of cluster-owned security groups.
//!
//! Owned groups may reference each other in live rules, and the provider
//! refuses to delete a group that is still referenced. Every group's
//! ingress permissions are therefore revoked before any group is deleted.
//! The per-group progression is modeled explicitly as
//! `Discovered -> Revoked -> Deleted`; a group skips `Revoked` only when it
//! had no permissions to revoke.

use super::{is_owned_by_cluster, SecurityGroupService};
use crate::error::ControllerError;
use cloudsec_client::{Filter, IpPermission, SecurityGroup};
use crds::tags::{cluster_tag_key, TAG_VALUE_OWNED};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupDeletionState {
    Discovered,
    Revoked,
    Deleted,
}

/// One owned group moving through the teardown protocol.
#[derive(Debug)]
struct GroupDeletion {
    id: String,
    name: String,
    permissions: Vec<IpPermission>,
    state: GroupDeletionState,
}

impl GroupDeletion {
    fn discovered(group: SecurityGroup) -> Self {
        Self {
            id: group.group_id,
            name: group.group_name,
            permissions: group.ip_permissions,
            state: GroupDeletionState::Discovered,
        }
    }

    fn needs_revocation(&self) -> bool {
        self.state == GroupDeletionState::Discovered && !self.permissions.is_empty()
    }

    fn mark_revoked(&mut self) {
        debug_assert!(self.needs_revocation());
        self.state = GroupDeletionState::Revoked;
    }

    /// A group may only be deleted once its permissions are gone.
    fn ready_to_delete(&self) -> bool {
        match self.state {
            GroupDeletionState::Revoked => true,
            GroupDeletionState::Discovered => self.permissions.is_empty(),
            GroupDeletionState::Deleted => false,
        }
    }

    fn mark_deleted(&mut self) {
        debug_assert!(self.ready_to_delete());
        self.state = GroupDeletionState::Deleted;
    }
}

impl SecurityGroupService<'_> {
    /// Deletes every security group owned by the cluster.
    ///
    /// Safe to call when nothing exists: an absent VPC ID is an immediate
    /// no-op. Any listing, describe, revoke or delete failure aborts the
    /// pass; already-applied teardown is picked up by the next call.
    pub async fn delete_all(&mut self) -> Result<(), ControllerError> {
        let cluster = self.scope.cluster_name.clone();
        let vpc_id = self.scope.vpc().id.clone();
        if vpc_id.is_empty() {
            debug!(
                "No VPC recorded for cluster {}, skipping security group deletion",
                cluster
            );
            return Ok(());
        }

        // Ownership is decided by tag, so overrides never show up here.
        let filters = vec![Filter::tag(&cluster_tag_key(&cluster), TAG_VALUE_OWNED)];
        let owned = self
            .cloud
            .list_security_groups(&vpc_id, &filters, true)
            .await
            .map_err(|source| ControllerError::Discovery {
                cluster: cluster.clone(),
                source,
            })?;
        let owned: Vec<SecurityGroup> = owned
            .into_iter()
            .filter(|g| is_owned_by_cluster(g, &cluster))
            .collect();
        if owned.is_empty() {
            debug!("No security groups owned by cluster {} in {}", cluster, vpc_id);
            return Ok(());
        }

        // Re-describe for the current permission sets; the listing may be
        // stale and revocation must not miss anything.
        let ids: Vec<String> = owned.iter().map(|g| g.group_id.clone()).collect();
        let detailed = self
            .cloud
            .describe_security_groups(&ids)
            .await
            .map_err(|source| ControllerError::Discovery {
                cluster: cluster.clone(),
                source,
            })?;
        let mut groups: Vec<GroupDeletion> =
            detailed.into_iter().map(GroupDeletion::discovered).collect();

        for group in groups.iter_mut().filter(|g| g.needs_revocation()) {
            self.cloud
                .revoke_security_group_ingress(&group.id, &group.permissions)
                .await
                .map_err(|source| ControllerError::Deletion {
                    cluster: cluster.clone(),
                    group: group.id.clone(),
                    source,
                })?;
            info!(
                "Revoked {} ingress permissions from security group {} ({})",
                group.permissions.len(),
                group.name,
                group.id
            );
            group.mark_revoked();
        }

        for group in &mut groups {
            self.cloud
                .delete_security_group(&group.id)
                .await
                .map_err(|source| ControllerError::Deletion {
                    cluster: cluster.clone(),
                    group: group.id.clone(),
                    source,
                })?;
            info!("Deleted security group {} ({})", group.name, group.id);
            group.mark_deleted();
        }

        self.scope.status.security_groups.clear();
        Ok(())
    }
}
