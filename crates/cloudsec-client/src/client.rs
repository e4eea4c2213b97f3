//! Firewall-group API client
//!
//! Implements the provider's security-group REST API. Listing is paginated
//! with opaque continuation tokens; all other operations are single calls.

use crate::cloud_trait::CloudSecClientTrait;
use crate::error::CloudSecError;
use crate::models::*;
use reqwest::Client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Firewall-group API client
pub struct CloudSecClient {
    client: Client,
    base_url: String,
    token: String,
}

impl CloudSecClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - API base URL (e.g., "https://cloudsec.internal")
    /// * `token` - API token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, CloudSecError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(CloudSecError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn groups_url(&self) -> String {
        format!("{}/v1/security-groups", self.base_url)
    }

    /// Build the listing query string from a VPC scope and filters.
    fn listing_query(vpc_id: &str, filters: &[Filter]) -> String {
        let mut query = format!("vpc-id={}", urlencoding::encode(vpc_id));
        for filter in filters {
            for value in &filter.values {
                query.push_str(&format!(
                    "&filter={}%3D{}",
                    urlencoding::encode(&filter.name),
                    urlencoding::encode(value)
                ));
            }
        }
        query
    }

    async fn check_response(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<String, CloudSecError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                CloudSecError::Authentication(format!("{context}: {status} - {body}")),
            ),
            StatusCode::NOT_FOUND => Err(CloudSecError::NotFound(format!("{context}: {body}"))),
            StatusCode::CONFLICT | StatusCode::FAILED_DEPENDENCY => Err(
                CloudSecError::FailedDependency(format!("{context}: {body}")),
            ),
            StatusCode::BAD_REQUEST => Err(CloudSecError::InvalidRequest(format!(
                "{context}: {body}"
            ))),
            _ => Err(CloudSecError::Api(format!("{context}: {status} - {body}"))),
        }
    }

    /// Fetch one listing page.
    async fn fetch_page(
        &self,
        vpc_id: &str,
        filters: &[Filter],
        next_token: Option<&str>,
    ) -> Result<SecurityGroupPage, CloudSecError> {
        let mut url = format!("{}?{}", self.groups_url(), Self::listing_query(vpc_id, filters));
        if let Some(token) = next_token {
            url.push_str(&format!("&pageToken={}", urlencoding::encode(token)));
        }
        debug!("Fetching security group page: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let body = self
            .check_response(response, "failed to list security groups")
            .await?;
        let page: SecurityGroupPage = serde_json::from_str(&body).map_err(|e| {
            CloudSecError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                body.chars().take(500).collect::<String>()
            ))
        })?;
        Ok(page)
    }

    async fn post_action(
        &self,
        url: &str,
        body: &impl serde::Serialize,
        context: &str,
    ) -> Result<String, CloudSecError> {
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await?;
        self.check_response(response, context).await
    }
}

#[async_trait::async_trait]
impl CloudSecClientTrait for CloudSecClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_credentials(&self) -> Result<(), CloudSecError> {
        // The status endpoint is lightweight and requires authentication.
        let url = format!("{}/v1/status", self.base_url);
        debug!("Validating cloud API token and connectivity");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        self.check_response(response, "failed to validate token")
            .await?;
        debug!("Token validated successfully");
        Ok(())
    }

    async fn list_security_groups(
        &self,
        vpc_id: &str,
        filters: &[Filter],
        fetch_all: bool,
    ) -> Result<Vec<SecurityGroup>, CloudSecError> {
        let mut page = self.fetch_page(vpc_id, filters, None).await?;
        if !fetch_all {
            return Ok(page.security_groups);
        }

        let mut all_groups = std::mem::take(&mut page.security_groups);
        let mut token = page.next_token;
        while let Some(next) = token {
            let mut page = self.fetch_page(vpc_id, filters, Some(&next)).await?;
            all_groups.append(&mut page.security_groups);
            token = page.next_token;
        }
        Ok(all_groups)
    }

    async fn describe_security_groups(
        &self,
        group_ids: &[String],
    ) -> Result<Vec<SecurityGroup>, CloudSecError> {
        let ids = group_ids
            .iter()
            .map(|id| urlencoding::encode(id).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/describe?group-ids={}", self.groups_url(), ids);
        debug!("Describing security groups: {}", ids);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let body = self
            .check_response(response, "failed to describe security groups")
            .await?;
        let page: SecurityGroupPage = serde_json::from_str(&body)?;
        Ok(page.security_groups)
    }

    async fn create_security_group(
        &self,
        request: CreateSecurityGroupRequest,
    ) -> Result<String, CloudSecError> {
        debug!(
            "Creating security group {} in {}",
            request.group_name, request.vpc_id
        );
        let body = self
            .post_action(
                &self.groups_url(),
                &request,
                "failed to create security group",
            )
            .await?;
        let created: CreateSecurityGroupResponse = serde_json::from_str(&body)?;
        Ok(created.group_id)
    }

    async fn authorize_security_group_ingress(
        &self,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), CloudSecError> {
        let url = format!(
            "{}/{}/authorize-ingress",
            self.groups_url(),
            urlencoding::encode(group_id)
        );
        debug!(
            "Authorizing {} ingress permissions on {}",
            permissions.len(),
            group_id
        );
        self.post_action(&url, &permissions, "failed to authorize ingress")
            .await?;
        Ok(())
    }

    async fn revoke_security_group_ingress(
        &self,
        group_id: &str,
        permissions: &[IpPermission],
    ) -> Result<(), CloudSecError> {
        let url = format!(
            "{}/{}/revoke-ingress",
            self.groups_url(),
            urlencoding::encode(group_id)
        );
        debug!(
            "Revoking {} ingress permissions on {}",
            permissions.len(),
            group_id
        );
        self.post_action(&url, &permissions, "failed to revoke ingress")
            .await?;
        Ok(())
    }

    async fn delete_security_group(&self, group_id: &str) -> Result<(), CloudSecError> {
        let url = format!("{}/{}", self.groups_url(), urlencoding::encode(group_id));
        debug!("Deleting security group {}", group_id);

        let response = self
            .client
            .delete(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        self.check_response(response, "failed to delete security group")
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_query_encodes_filters() {
        let filters = vec![Filter::tag("netops.stratoform.io/cluster/demo", "owned")];
        let query = CloudSecClient::listing_query("vpc-1", &filters);
        assert!(query.starts_with("vpc-id=vpc-1"));
        assert!(query.contains("tag%3Anetops.stratoform.io%2Fcluster%2Fdemo%3Downed"));
    }
}
