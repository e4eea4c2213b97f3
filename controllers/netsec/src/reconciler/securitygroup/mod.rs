//! Security group reconciliation engine.
//!
//! Converges a cluster's firewall groups against its `NetworkSpec`:
//! resolves each role to an override or a managed group, creates missing
//! managed groups with their derived ingress rules, and tears everything
//! down on cluster deletion. Convergence is create-once: a group that
//! already exists is skipped, not diffed against its live rules.

pub(crate) mod conversion;
mod deletion;
mod groups;
mod rules;

#[cfg(test)]
mod conversion_test;
#[cfg(test)]
mod deletion_test;

use crate::error::ControllerError;
use crate::scope::ClusterScope;
use cloudsec_client::{CloudSecClientTrait, CreateSecurityGroupRequest, SecurityGroup};
use crds::SecurityGroupRole;
use tracing::{debug, info};

/// IPv4 block matching any source.
pub const ANY_IPV4_CIDR_BLOCK: &str = "0.0.0.0/0";

/// IPv6 block matching any source.
pub const ANY_IPV6_CIDR_BLOCK: &str = "::/0";

/// One reconcile/delete pass over a cluster's security groups.
///
/// Roles are processed strictly in the supplied order: later roles may
/// reference group IDs the pass assigned to earlier roles.
pub struct SecurityGroupService<'a> {
    scope: &'a mut ClusterScope,
    roles: &'a [SecurityGroupRole],
    cloud: &'a dyn CloudSecClientTrait,
}

impl<'a> SecurityGroupService<'a> {
    /// Creates a service over a scope, an ordered role list and a cloud
    /// client.
    pub fn new(
        scope: &'a mut ClusterScope,
        roles: &'a [SecurityGroupRole],
        cloud: &'a dyn CloudSecClientTrait,
    ) -> Self {
        Self {
            scope,
            roles,
            cloud,
        }
    }

    /// Converges all roles' security groups. Idempotent: repeat calls on a
    /// converged cluster issue no mutations.
    pub async fn reconcile(&mut self) -> Result<(), ControllerError> {
        let cluster = self.scope.cluster_name.clone();
        debug!("Reconciling security groups for cluster {}", cluster);

        // A managed VPC is deleted by this controller; referencing external
        // groups from it would make teardown unsound.
        if self.scope.vpc().is_managed(&cluster)
            && !self.scope.security_group_overrides().is_empty()
        {
            return Err(ControllerError::InvalidConfig(format!(
                "security group overrides provided for managed vpc \"{cluster}\""
            )));
        }

        let vpc_id = self.scope.vpc().id.clone();
        let existing = self
            .cloud
            .list_security_groups(&vpc_id, &[], false)
            .await
            .map_err(|source| ControllerError::Discovery {
                cluster: cluster.clone(),
                source,
            })?;

        let roles = self.roles;
        for &role in roles {
            if let Some(override_id) = self.scope.security_group_overrides().get(&role).cloned() {
                // Overrides are resolved by ID and never mutated. A missing
                // override is still recorded; its absence surfaces when a
                // dependent cloud call fails.
                let name = existing
                    .iter()
                    .find(|g| g.group_id == override_id)
                    .map(|g| g.group_name.clone())
                    .unwrap_or_default();
                info!(
                    "Using security group override {} for role {} of cluster {}",
                    override_id, role, cluster
                );
                self.scope.record_security_group(role, override_id, name);
                continue;
            }

            let name = self.generate_name(role);
            if let Some(found) = existing.iter().find(|g| g.group_name == name) {
                debug!(
                    "Security group {} ({}) already exists, skipping",
                    name, found.group_id
                );
                self.scope
                    .record_security_group(role, found.group_id.clone(), name);
                continue;
            }

            self.create_security_group(role, &vpc_id, name).await?;
        }

        Ok(())
    }

    /// Creates one managed group, records its ID, then authorizes its
    /// derived ingress rules in a single batch call.
    async fn create_security_group(
        &mut self,
        role: SecurityGroupRole,
        vpc_id: &str,
        name: String,
    ) -> Result<(), ControllerError> {
        let cluster = self.scope.cluster_name.clone();
        let request = CreateSecurityGroupRequest {
            vpc_id: vpc_id.to_string(),
            group_name: name.clone(),
            description: self.generate_description(role),
            tags: conversion::tags_to_api(&self.security_group_tags(role)),
        };
        let group_id = self
            .cloud
            .create_security_group(request)
            .await
            .map_err(|source| ControllerError::SecurityGroup {
                cluster: cluster.clone(),
                role,
                source,
            })?;
        info!(
            "Created security group {} ({}) for cluster {}",
            name, group_id, cluster
        );

        // Record before deriving rules so the role can reference itself.
        self.scope
            .record_security_group(role, group_id.clone(), name);

        let ingress_rules = self.security_group_ingress_rules(role);
        if ingress_rules.is_empty() {
            return Ok(());
        }

        let permissions = conversion::permissions_from_ingress_rules(&ingress_rules);
        self.cloud
            .authorize_security_group_ingress(&group_id, &permissions)
            .await
            .map_err(|source| ControllerError::SecurityGroup {
                cluster,
                role,
                source,
            })?;
        info!(
            "Authorized {} ingress rules on security group {}",
            permissions.len(),
            group_id
        );
        Ok(())
    }
}

/// True when a discovered group carries this cluster's ownership tag.
pub(crate) fn is_owned_by_cluster(group: &SecurityGroup, cluster_name: &str) -> bool {
    crds::is_cluster_owned(&conversion::tags_from_api(&group.tags), cluster_name)
}
