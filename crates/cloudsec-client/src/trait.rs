//! CloudSecClient trait for mocking
//!
//! This trait abstracts the firewall-group API client so controller unit
//! tests can substitute an in-memory implementation. The concrete
//! CloudSecClient implements this trait.

use crate::error::CloudSecError;
use crate::models::*;

/// Trait for firewall-group API operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing
/// runtime. Cancellation is cooperative: dropping a returned future aborts
/// the in-flight call.
#[async_trait::async_trait]
pub trait CloudSecClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the API credentials
    async fn validate_credentials(&self) -> Result<(), CloudSecError>;

    /// List security groups in a VPC, optionally filtered.
    ///
    /// With `fetch_all` set, follows continuation tokens until the listing
    /// is exhausted; otherwise returns the first page only.
    async fn list_security_groups(
        &self,
        vpc_id: &str,
        filters: &[Filter],
        fetch_all: bool,
    ) -> Result<Vec<SecurityGroup>, CloudSecError>;

    /// Describe specific groups by ID, including their current ingress
    /// permission sets.
    async fn describe_security_groups(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<SecurityGroup>, CloudSecError>;

    /// Create a group and return its provider-assigned ID.
    async fn create_security_group(
        &self,
        request: CreateSecurityGroupRequest,
    ) -> Result<String, CloudSecError>;

    /// Authorize a batch of ingress permissions on a group.
    async fn authorize_security_group_ingress(
        &self,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), CloudSecError>;

    /// Revoke a batch of ingress permissions from a group.
    async fn revoke_security_group_ingress(
        &self,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), CloudSecError>;

    /// Delete a group. Fails with [`CloudSecError::FailedDependency`] while
    /// other groups still reference it in live rules.
    async fn delete_security_group(&self, group_id: &str) -> Result<(), CloudSecError>;
}
