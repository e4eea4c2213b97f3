//! Resource tagging helpers
//!
//! Cloud-side ownership is expressed through string tags rather than real
//! references, so every tag key used by the controllers is built here and
//! nowhere else. Ownership checks go through [`is_cluster_owned`] instead of
//! comparing tag literals inline.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag value marking a resource as created and owned by this controller.
pub const TAG_VALUE_OWNED: &str = "owned";

/// Key of the human-readable name tag.
pub const NAME_TAG_KEY: &str = "Name";

/// Key of the role tag identifying a security group's purpose.
pub const ROLE_TAG_KEY: &str = "netops.stratoform.io/role";

/// Returns the per-cluster ownership tag key.
#[must_use]
pub fn cluster_tag_key(cluster_name: &str) -> String {
    format!("netops.stratoform.io/cluster/{cluster_name}")
}

/// Returns the legacy in-tree cloud-provider ownership tag key.
///
/// The generic load-balancer security group may carry this so the legacy
/// cloud provider recognizes it when attaching load balancers.
#[must_use]
pub fn legacy_cloud_provider_tag_key(cluster_name: &str) -> String {
    format!("kubernetes.io/cluster/{cluster_name}")
}

/// True when the tag set marks the resource as owned by the named cluster.
#[must_use]
pub fn is_cluster_owned(tags: &Tags, cluster_name: &str) -> bool {
    tags.get(&cluster_tag_key(cluster_name))
        .is_some_and(|v| v == TAG_VALUE_OWNED)
}

/// A set of cloud resource tags.
///
/// Backed by a `BTreeMap` so serialization and API payload ordering are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Tags(pub BTreeMap<String, String>);

impl Tags {
    /// Creates an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts a tag, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up a tag value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// True when the key is present, regardless of value.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True when no tags are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// True when the set marks the resource as owned by the named cluster.
    #[must_use]
    pub fn has_owned(&self, cluster_name: &str) -> bool {
        is_cluster_owned(self, cluster_name)
    }
}

impl FromIterator<(String, String)> for Tags {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for Tags {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
