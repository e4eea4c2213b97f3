//! Controller-specific error types.
//!
//! Cloud failures keep their typed source so callers can still distinguish
//! not-found/failed-dependency from transient errors after wrapping.

use cloudsec_client::CloudSecError;
use crds::SecurityGroupRole;
use kube::Error as KubeError;
use thiserror::Error;

/// Errors that can occur in the netsec controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] KubeError),

    /// Cloud API error without additional context
    #[error("Cloud API error: {0}")]
    Cloud(#[from] CloudSecError),

    /// Invalid configuration; fatal, never retried
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Discovering existing security groups failed
    #[error("failed to discover security groups for cluster {cluster}: {source}")]
    Discovery {
        /// Cluster whose groups were being listed or described.
        cluster: String,
        /// Underlying cloud API error.
        #[source]
        source: CloudSecError,
    },

    /// A per-role security group operation failed during reconciliation
    #[error("security group operation failed for cluster {cluster}, role {role}: {source}")]
    SecurityGroup {
        /// Cluster being reconciled.
        cluster: String,
        /// Role whose group operation failed.
        role: SecurityGroupRole,
        /// Underlying cloud API error.
        #[source]
        source: CloudSecError,
    },

    /// A security group teardown step failed
    #[error("security group deletion failed for cluster {cluster}, group {group}: {source}")]
    Deletion {
        /// Cluster being torn down.
        cluster: String,
        /// Group ID the revoke or delete step targeted.
        group: String,
        /// Underlying cloud API error.
        #[source]
        source: CloudSecError,
    },

    /// Resource watch failed
    #[error("Resource watch failed: {0}")]
    Watch(String),
}

impl ControllerError {
    /// True for configuration errors that must not be retried.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::InvalidConfig(_))
    }
}
