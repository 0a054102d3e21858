/// Identity admin client — the only code that talks to the auth service's admin API.
///
/// Authenticates with the service-role key. Used by the reset flow to enumerate and
/// delete accounts one at a time.
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::StoreError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdentityPage {
    #[serde(default)]
    users: Vec<Identity>,
}

#[derive(Debug, Deserialize)]
struct AdminApiError {
    #[serde(alias = "msg", alias = "error_description", alias = "error")]
    message: String,
}

#[async_trait]
pub trait IdentityAdmin: Send + Sync {
    /// One page of identities. Pages are 1-based; an empty page means the end.
    async fn list_identities(&self, page: u32, per_page: u32)
        -> Result<Vec<Identity>, StoreError>;

    async fn delete_identity(&self, id: Uuid) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct AuthAdminClient {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl AuthAdminClient {
    pub fn new(base_url: impl Into<String>, service_role_key: String) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .context("Failed to build HTTP client")?,
            base_url: base_url.into(),
            service_role_key,
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// Maps a non-success response to a typed error, preferring the service's own message.
    async fn error_from_response(response: reqwest::Response, call: AdminCall) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<AdminApiError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);

        if status.is_server_error() {
            warn!("Identity admin API returned {status}: {detail}");
        }
        classify_status(status, detail, call)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminCall {
    List,
    Delete,
}

/// A 404 means "already gone" only when deleting one identity. Anywhere else it means
/// the endpoint itself is wrong, which is a rejection like any other 4xx.
fn classify_status(status: reqwest::StatusCode, detail: String, call: AdminCall) -> StoreError {
    if status == reqwest::StatusCode::NOT_FOUND && call == AdminCall::Delete {
        StoreError::NotFound(detail)
    } else if status.is_server_error() {
        StoreError::Unreachable(format!("identity service returned {status}: {detail}"))
    } else {
        StoreError::Rejected {
            code: Some(status.as_u16().to_string()),
            detail,
        }
    }
}

#[async_trait]
impl IdentityAdmin for AuthAdminClient {
    async fn list_identities(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Identity>, StoreError> {
        let response = self
            .authorize(self.client.get(format!("{}/admin/users", self.base_url)))
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, AdminCall::List).await);
        }

        let page_body: IdentityPage = response.json().await?;
        debug!("Identity page {page}: {} identities", page_body.users.len());
        Ok(page_body.users)
    }

    async fn delete_identity(&self, id: Uuid) -> Result<(), StoreError> {
        let response = self
            .authorize(
                self.client
                    .delete(format!("{}/admin/users/{id}", self.base_url)),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, AdminCall::Delete).await);
        }
        Ok(())
    }
}
