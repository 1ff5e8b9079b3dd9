//! HTTP/JSON client for the hosted provisioning API
//!
//! Implements the directory and org-unit service seams over the remote
//! provisioning endpoints. Listing endpoints are paginated with `pageToken`
//! cursors and drained fully before returning. Structured 4xx bodies carry a
//! `reason` code and optionally the offending request field as
//! `invalidInput`; those map to [`ServiceError::Rejected`].
//!
//! Token acquisition and persistence are a caller concern; this client is
//! handed a ready bearer token.

use crate::ClientConfig;
use crate::directory::{AccountStatus, DirectoryService};
use crate::error::{Error, RejectReason, Result, ServiceError, ValidationError};
use crate::member::MemberId;
use crate::orgunit::{OrgUnitChanges, OrgUnitInfo, OrgUnitService};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Client for the remote provisioning API
pub struct RestProvisioningClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
    domain: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    reason: String,
    #[serde(rename = "invalidInput")]
    invalid_input: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListPage {
    items: Vec<String>,
    #[serde(rename = "nextPage")]
    next_page: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateUnitBody<'a> {
    name: &'a str,
    description: Option<&'a str>,
    #[serde(rename = "parentOrgUnitPath")]
    parent_path: &'a str,
    #[serde(rename = "blockInheritance")]
    block_inheritance: bool,
}

#[derive(Debug, Serialize)]
struct UpdateUnitBody<'a> {
    #[serde(rename = "newName", skip_serializing_if = "Option::is_none")]
    new_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "parentOrgUnitPath", skip_serializing_if = "Option::is_none")]
    parent_path: Option<&'a str>,
    #[serde(rename = "blockInheritance", skip_serializing_if = "Option::is_none")]
    block_inheritance: Option<bool>,
    #[serde(rename = "usersToMove", skip_serializing_if = "Vec::is_empty")]
    users_to_move: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UnitInfoBody {
    name: String,
    description: Option<String>,
    #[serde(rename = "parentOrgUnitPath")]
    parent_path: Option<String>,
    #[serde(rename = "blockInheritance", default)]
    block_inheritance: bool,
}

impl RestProvisioningClient {
    /// Create a client from configuration and an already-acquired token
    pub fn new(config: &ClientConfig, token: &str) -> Result<Self> {
        if config.domain.is_empty() {
            return Err(Error::Validation(ValidationError::missing_field("domain")));
        }
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            Error::Validation(ValidationError::invalid_parameter(
                "base_url",
                &e.to_string(),
            ))
        })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(Error::from)?;

        Ok(Self {
            http,
            base_url,
            token: token.to_string(),
            domain: config.domain.clone(),
        })
    }

    /// Build a URL from path segments, percent-encoding each one.
    ///
    /// Org-unit paths contain '/' and must travel as a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::Validation(ValidationError::invalid_parameter(
                    "base_url",
                    "cannot be a base URL",
                ))
            })?;
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let code = status.as_u16();
        let text = response.text().await.unwrap_or_default();
        if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
            return Err(Error::Service(ServiceError::Rejected {
                reason: RejectReason::parse(&body.reason),
                field: body.invalid_input,
            }));
        }
        Err(Error::Service(ServiceError::server_error(code, &text)))
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Error::from)?;
        Self::check(response).await
    }

    /// Drain a paginated listing endpoint into member identifiers
    async fn list_members(&self, url: Url) -> Result<Vec<MemberId>> {
        let mut members = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut page_url = url.clone();
            if let Some(token) = &cursor {
                page_url.query_pairs_mut().append_pair("pageToken", token);
            }
            let page: ListPage = self.get(page_url).await?.json().await.map_err(Error::from)?;
            for item in page.items {
                members.push(MemberId::parse(&item)?);
            }
            match page.next_page {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(members)
    }
}

#[async_trait::async_trait]
impl DirectoryService for RestProvisioningClient {
    async fn resolve_account(&self, domain: &str, local_part: &str) -> Result<AccountStatus> {
        let url = self.endpoint(&["domains", domain, "users", local_part])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(Error::from)?;

        // The two known ineligibility conditions are statuses, not errors
        match response.status() {
            StatusCode::NOT_FOUND => return Ok(AccountStatus::NotFound),
            StatusCode::FORBIDDEN => return Ok(AccountStatus::NotAuthorized),
            _ => {}
        }
        Self::check(response).await?;
        Ok(AccountStatus::Exists)
    }

    async fn group_members(&self, group: &str) -> Result<Vec<MemberId>> {
        let url = self.endpoint(&["domains", &self.domain, "groups", group, "members"])?;
        self.list_members(url).await
    }

    async fn all_users(&self) -> Result<Vec<MemberId>> {
        let url = self.endpoint(&["domains", &self.domain, "users"])?;
        self.list_members(url).await
    }
}

#[async_trait::async_trait]
impl OrgUnitService for RestProvisioningClient {
    async fn unit_info(&self, unit: &str) -> Result<OrgUnitInfo> {
        let url = self.endpoint(&["domains", &self.domain, "orgunits", unit])?;
        let body: UnitInfoBody = self.get(url).await?.json().await.map_err(Error::from)?;
        Ok(OrgUnitInfo {
            name: body.name,
            description: body.description,
            parent_path: body.parent_path,
            block_inheritance: body.block_inheritance,
        })
    }

    async fn unit_members(&self, unit: &str) -> Result<Vec<MemberId>> {
        let url = self.endpoint(&["domains", &self.domain, "orgunits", unit, "members"])?;
        self.list_members(url).await
    }

    async fn create_unit(
        &self,
        name: &str,
        description: Option<&str>,
        parent_path: &str,
        block_inheritance: bool,
    ) -> Result<()> {
        let url = self.endpoint(&["domains", &self.domain, "orgunits"])?;
        let body = CreateUnitBody {
            name,
            description,
            parent_path,
            block_inheritance,
        };
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(Error::from)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn update_unit(
        &self,
        unit: &str,
        changes: &OrgUnitChanges,
        move_members: &[MemberId],
    ) -> Result<()> {
        let url = self.endpoint(&["domains", &self.domain, "orgunits", unit])?;
        let body = UpdateUnitBody {
            new_name: changes.new_name.as_deref(),
            description: changes.description.as_deref(),
            parent_path: changes.parent_path.as_deref(),
            block_inheritance: changes.block_inheritance,
            users_to_move: move_members
                .iter()
                .map(|m| m.qualified(&self.domain))
                .collect(),
        };
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(Error::from)?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> RestProvisioningClient {
        RestProvisioningClient::new(&ClientConfig::test(), "test-token").unwrap()
    }

    #[test]
    fn test_client_requires_domain() {
        let config = ClientConfig {
            domain: String::new(),
            ..ClientConfig::test()
        };
        assert!(RestProvisioningClient::new(&config, "token").is_err());
    }

    #[test]
    fn test_client_rejects_malformed_base_url() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::test()
        };
        assert!(RestProvisioningClient::new(&config, "token").is_err());
    }

    #[test]
    fn test_endpoint_encodes_unit_paths_as_one_segment() {
        let client = test_client();
        let url = client
            .endpoint(&["domains", "example.com", "orgunits", "Sales/EMEA"])
            .unwrap();
        assert!(url.path().ends_with("/orgunits/Sales%2FEMEA"));
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"reason": "EntityDoesNotExist", "invalidInput": "orgUnitUsersToMove"}"#,
        )
        .unwrap();
        assert_eq!(body.reason, "EntityDoesNotExist");
        assert_eq!(body.invalid_input.as_deref(), Some("orgUnitUsersToMove"));
    }

    #[test]
    fn test_update_body_skips_unset_fields() {
        let body = UpdateUnitBody {
            new_name: None,
            description: Some("Engineering"),
            parent_path: None,
            block_inheritance: None,
            users_to_move: vec!["jsmith@example.com".to_string()],
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("description"));
        assert!(json.contains("usersToMove"));
        assert!(!json.contains("newName"));
        assert!(!json.contains("blockInheritance"));
    }
}
