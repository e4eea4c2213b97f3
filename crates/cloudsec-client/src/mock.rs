//! Mock CloudSecClient for unit testing
//!
//! In-memory implementation of `CloudSecClientTrait` used by controller
//! unit tests without a running cloud API. Beyond the resource store, the
//! mock records every operation in order and supports per-operation
//! injected failures, so call-ordering contracts (revoke before delete,
//! abort on first failure) are assertable.
//!
//! Deleting a group that is still referenced by another group's live
//! source-group pairs fails with `FailedDependency`, mirroring provider
//! behavior.

use crate::cloud_trait::CloudSecClientTrait;
use crate::error::CloudSecError;
use crate::models::*;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock CloudSecClient for testing
#[derive(Clone)]
pub struct MockCloudSecClient {
    base_url: String,
    // In-memory storage, keyed by group ID
    groups: Arc<Mutex<HashMap<String, SecurityGroup>>>,
    // Ordered log of operations, e.g. "create:test-cluster-node"
    calls: Arc<Mutex<Vec<String>>>,
    // Operation key -> failure message
    failures: Arc<Mutex<HashMap<String, String>>>,
    // Counter for generating IDs
    next_id: Arc<Mutex<u64>>,
}

impl MockCloudSecClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            groups: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a security group to the mock store (for test setup)
    pub fn add_security_group(&self, group: SecurityGroup) {
        self.groups
            .lock()
            .unwrap()
            .insert(group.group_id.clone(), group);
    }

    /// Inject a failure for an operation key.
    ///
    /// Keys match the recorded call labels: `list:<vpc>`, `describe`,
    /// `create:<name>`, `authorize:<id>`, `revoke:<id>`, `delete:<id>`.
    /// Listing and describe failures surface as `FailedDependency`, all
    /// others as `Api`.
    pub fn fail_on(&self, op: impl Into<String>, message: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .insert(op.into(), message.into());
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// Snapshot of the recorded operation log.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Clear the recorded operation log (for multi-pass tests).
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Current state of a stored group, if any.
    pub fn group(&self, group_id: &str) -> Option<SecurityGroup> {
        self.groups.lock().unwrap().get(group_id).cloned()
    }

    /// Number of groups currently stored.
    pub fn group_count(&self) -> usize {
        self.groups.lock().unwrap().len()
    }

    fn record(&self, op: String) -> Result<(), CloudSecError> {
        self.calls.lock().unwrap().push(op.clone());
        if let Some(message) = self.failures.lock().unwrap().get(&op) {
            let message = message.clone();
            return if op.starts_with("list") || op.starts_with("describe") {
                Err(CloudSecError::FailedDependency(message))
            } else {
                Err(CloudSecError::Api(message))
            };
        }
        Ok(())
    }

    fn next_id(&self) -> u64 {
        let mut id = self.next_id.lock().unwrap();
        let current = *id;
        *id += 1;
        current
    }

    fn matches_filter(group: &SecurityGroup, filter: &Filter) -> bool {
        match filter.name.as_str() {
            "group-name" => filter.values.iter().any(|v| *v == group.group_name),
            "group-id" => filter.values.iter().any(|v| *v == group.group_id),
            name => match name.strip_prefix("tag:") {
                Some(key) => group
                    .tag(key)
                    .is_some_and(|value| filter.values.iter().any(|v| v == value)),
                None => false,
            },
        }
    }
}

#[async_trait::async_trait]
impl CloudSecClientTrait for MockCloudSecClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_credentials(&self) -> Result<(), CloudSecError> {
        Ok(())
    }

    async fn list_security_groups(
        &self,
        vpc_id: &str,
        filters: &[Filter],
        _fetch_all: bool,
    ) -> Result<Vec<SecurityGroup>, CloudSecError> {
        self.record(format!("list:{vpc_id}"))?;
        let groups = self.groups.lock().unwrap();
        let mut matched: Vec<SecurityGroup> = groups
            .values()
            .filter(|g| g.vpc_id == vpc_id)
            .filter(|g| filters.iter().all(|f| Self::matches_filter(g, f)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.group_id.cmp(&b.group_id));
        Ok(matched)
    }

    async fn describe_security_groups(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<SecurityGroup>, CloudSecError> {
        self.record("describe".to_string())?;
        let groups = self.groups.lock().unwrap();
        let mut matched: Vec<SecurityGroup> = group_ids
            .iter()
            .filter_map(|id| groups.get(id).cloned())
            .collect();
        matched.sort_by(|a, b| a.group_id.cmp(&b.group_id));
        Ok(matched)
    }

    async fn create_security_group(
        &self,
        request: CreateSecurityGroupRequest,
    ) -> Result<String, CloudSecError> {
        self.record(format!("create:{}", request.group_name))?;
        let mut groups = self.groups.lock().unwrap();
        if groups
            .values()
            .any(|g| g.vpc_id == request.vpc_id && g.group_name == request.group_name)
        {
            return Err(CloudSecError::InvalidRequest(format!(
                "security group {} already exists in {}",
                request.group_name, request.vpc_id
            )));
        }

        let group_id = format!("sg-{}", self.next_id());
        groups.insert(
            group_id.clone(),
            SecurityGroup {
                group_id: group_id.clone(),
                group_name: request.group_name,
                description: request.description,
                vpc_id: request.vpc_id,
                tags: request.tags,
                ip_permissions: Vec::new(),
            },
        );
        Ok(group_id)
    }

    async fn authorize_security_group_ingress(
        &self,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), CloudSecError> {
        self.record(format!("authorize:{group_id}"))?;
        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| CloudSecError::NotFound(format!("Group {group_id} not found")))?;
        group.ip_permissions.extend_from_slice(permissions);
        Ok(())
    }

    async fn revoke_security_group_ingress(
        &self,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), CloudSecError> {
        self.record(format!("revoke:{group_id}"))?;
        let mut groups = self.groups.lock().unwrap();
        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| CloudSecError::NotFound(format!("Group {group_id} not found")))?;
        group
            .ip_permissions
            .retain(|existing| !permissions.contains(existing));
        Ok(())
    }

    async fn delete_security_group(&self, group_id: &str) -> Result<(), CloudSecError> {
        self.record(format!("delete:{group_id}"))?;
        let mut groups = self.groups.lock().unwrap();
        if !groups.contains_key(group_id) {
            return Err(CloudSecError::NotFound(format!(
                "Group {group_id} not found"
            )));
        }

        let referenced = groups.values().any(|g| {
            g.group_id != group_id
                && g.ip_permissions
                    .iter()
                    .flat_map(|p| &p.group_pairs)
                    .any(|pair| pair.group_id == group_id)
        });
        if referenced {
            return Err(CloudSecError::FailedDependency(format!(
                "Group {group_id} is referenced by another group's rules"
            )));
        }

        groups.remove(group_id);
        Ok(())
    }
}
