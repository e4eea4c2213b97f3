//! Reconciliation logic for ClusterNetwork resources.
//!
//! The reconciler owns the cloud client and the ordered role list, builds a
//! `ClusterScope` per pass, runs the security-group engine and writes the
//! resulting status back through the status subresource.

pub mod securitygroup;

use crate::error::ControllerError;
use crate::scope::ClusterScope;
use cloudsec_client::CloudSecClientTrait;
use crds::{ClusterNetwork, ClusterNetworkStatus, NetworkState, SecurityGroupRole};
use kube::api::{Patch, PatchParams};
use kube::Api;
use securitygroup::SecurityGroupService;
use tracing::{error, info, warn};

/// Reconciles ClusterNetwork resources against the cloud firewall API.
pub struct Reconciler {
    pub(crate) cloud: Box<dyn CloudSecClientTrait>,
    pub(crate) cluster_network_api: Api<ClusterNetwork>,
    /// Role processing order; later roles may reference earlier roles'
    /// group IDs.
    pub(crate) roles: Vec<SecurityGroupRole>,
}

impl Reconciler {
    /// Creates a new reconciler instance with the canonical role order.
    pub fn new(
        cloud: impl CloudSecClientTrait + 'static,
        cluster_network_api: Api<ClusterNetwork>,
    ) -> Self {
        Self {
            cloud: Box::new(cloud),
            cluster_network_api,
            roles: SecurityGroupRole::ORDERED.to_vec(),
        }
    }

    /// Converges a cluster's security groups and records the outcome in
    /// status.
    pub async fn reconcile_cluster_network(
        &self,
        cn: &ClusterNetwork,
    ) -> Result<(), ControllerError> {
        let name = cn
            .metadata
            .name
            .as_ref()
            .ok_or_else(|| ControllerError::InvalidConfig("ClusterNetwork missing name".to_string()))?;
        let namespace = cn.metadata.namespace.as_deref().unwrap_or("default");
        info!("Reconciling ClusterNetwork {}/{}", namespace, name);

        let mut scope = ClusterScope::from_cluster_network(cn);
        let result = SecurityGroupService::new(&mut scope, &self.roles, self.cloud.as_ref())
            .reconcile()
            .await;

        match &result {
            Ok(()) => {
                scope.status.state = NetworkState::Provisioned;
                scope.status.failure_message = None;
            }
            Err(e) => {
                error!(
                    "Security group reconciliation failed for ClusterNetwork {}/{}: {}",
                    namespace, name, e
                );
                scope.status.state = NetworkState::Failed;
                scope.status.failure_message = Some(e.to_string());
            }
        }

        if let Err(patch_err) = self.patch_status(name, &scope.status).await {
            // The engine error is the actionable one; keep it if both fail.
            if result.is_err() {
                warn!(
                    "Failed to record failure status for ClusterNetwork {}/{}: {}",
                    namespace, name, patch_err
                );
            } else {
                return Err(patch_err);
            }
        }

        result
    }

    /// Tears down a cluster's security groups during finalizer cleanup.
    pub async fn delete_cluster_network(&self, cn: &ClusterNetwork) -> Result<(), ControllerError> {
        let name = cn
            .metadata
            .name
            .as_ref()
            .ok_or_else(|| ControllerError::InvalidConfig("ClusterNetwork missing name".to_string()))?;
        let namespace = cn.metadata.namespace.as_deref().unwrap_or("default");
        info!("Deleting security groups for ClusterNetwork {}/{}", namespace, name);

        let mut scope = ClusterScope::from_cluster_network(cn);
        SecurityGroupService::new(&mut scope, &self.roles, self.cloud.as_ref())
            .delete_all()
            .await?;

        info!(
            "Security groups for ClusterNetwork {}/{} deleted",
            namespace, name
        );
        Ok(())
    }

    async fn patch_status(
        &self,
        name: &str,
        status: &ClusterNetworkStatus,
    ) -> Result<(), ControllerError> {
        let status_patch = serde_json::json!({ "status": status });
        let pp = PatchParams::default();
        self.cluster_network_api
            .patch_status(name, &pp, &Patch::Merge(&status_patch))
            .await
            .map_err(ControllerError::Kube)?;
        Ok(())
    }
}
