//! Managed-group identity: names, descriptions and tag sets.

use super::SecurityGroupService;
use crds::tags::{
    cluster_tag_key, legacy_cloud_provider_tag_key, NAME_TAG_KEY, ROLE_TAG_KEY, TAG_VALUE_OWNED,
};
use crds::{SecurityGroupRole, Tags};

impl SecurityGroupService<'_> {
    /// Deterministic name of the managed group for a role.
    pub(crate) fn generate_name(&self, role: SecurityGroupRole) -> String {
        format!("{}-{}", self.scope.cluster_name, role.suffix())
    }

    /// Description of the managed group for a role.
    pub(crate) fn generate_description(&self, role: SecurityGroupRole) -> String {
        format!(
            "Kubernetes cluster {}: {}",
            self.scope.cluster_name,
            role.suffix()
        )
    }

    /// Tag set applied to a managed group at creation.
    ///
    /// The generic LB group additionally carries the legacy cloud-provider
    /// ownership key, but only when the cluster's additional tags declare
    /// it.
    pub(crate) fn security_group_tags(&self, role: SecurityGroupRole) -> Tags {
        let cluster = &self.scope.cluster_name;
        let mut tags = Tags::new();
        tags.insert(NAME_TAG_KEY, self.generate_name(role));
        tags.insert(cluster_tag_key(cluster), TAG_VALUE_OWNED);
        tags.insert(ROLE_TAG_KEY, role.suffix());

        if role == SecurityGroupRole::Lb {
            let legacy_key = legacy_cloud_provider_tag_key(cluster);
            if self.scope.additional_tags.contains_key(&legacy_key) {
                tags.insert(legacy_key, TAG_VALUE_OWNED);
            }
        }

        tags
    }
}
