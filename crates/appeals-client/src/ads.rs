//! Typed client for the ads platform REST API.
//!
//! ## Paths (relative to the configured base URL)
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/v1/accounts/{account}/creatives?status=ENABLED&pageSize=N[&pageToken=T]` | List enabled creatives |
//! | GET    | `/v1/accounts/{account}/groups/{groupId}/creatives/{creativeId}` | Resolve one creative (404 = absent) |
//! | POST   | `/v1/accounts/{account}/groups/{groupId}/creatives/{creativeId}:appeal` | Appeal policy topics |
//!
//! Listing and lookup retry on transport errors, `429` and `5xx` within the
//! configured budget. The appeal action does not: a request that timed out
//! may still have been accepted, and a blind retry could appeal twice.

use std::collections::HashSet;
use std::time::Duration;

use appeals_core::{
    AppealGateway, AppealTarget, Creative, CreativeId, CreativeSource, GroupId, PolicyTopic,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{AdsApiConfig, ConfigError};
use crate::error::ClientError;
use crate::retry::ReadRetry;

// -- Wire types ---------------------------------------------------------------

/// One page of the creative listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCreativesResponse {
    #[serde(default)]
    pub creatives: Vec<Creative>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Body of the appeal action.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealRequest<'a> {
    /// Resource name returned by the lookup; omitted when the platform sent none.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub resource_name: &'a str,
    pub justification: &'a str,
    pub policy_topics: Vec<&'a str>,
}

// -- Client -------------------------------------------------------------------

/// Client for one ads platform account.
#[derive(Debug, Clone)]
pub struct AdsClient {
    http: reqwest::Client,
    base_url: Url,
    account_id: String,
    page_size: u32,
    retry: ReadRetry,
}

impl AdsClient {
    /// Build a client from configuration.
    pub fn new(config: &AdsApiConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                let mut value = reqwest::header::HeaderValue::from_str(&format!(
                    "Bearer {}",
                    config.api_token.as_str()
                ))
                .map_err(|_| ConfigError::InvalidToken)?;
                value.set_sensitive(true);
                headers.insert(reqwest::header::AUTHORIZATION, value);
                headers
            })
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            account_id: config.account_id.clone(),
            page_size: config.page_size,
            retry: ReadRetry::new(config.max_retries),
        })
    }

    /// Account this client audits.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidUrl("ADS_API_URL", "not a base URL".into()))?
            .pop_if_empty()
            .extend(["v1", "accounts", self.account_id.as_str()])
            .extend(segments);
        Ok(url)
    }

    /// Fetch one page of enabled creatives.
    ///
    /// Calls `GET {base}/v1/accounts/{account}/creatives`.
    pub async fn list_page(&self, page_token: Option<&str>) -> Result<ListCreativesResponse, ClientError> {
        let endpoint = "GET /creatives";
        let url = self.url(&["creatives"])?;
        let mut query = vec![
            ("status", "ENABLED".to_string()),
            ("pageSize", self.page_size.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let resp = self.retry.send(endpoint, || self.http.get(url.clone()).query(&query).send())
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(ClientError::from_response(endpoint, resp).await);
        }

        resp.json().await.map_err(|e| ClientError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    /// Fetch every page of enabled creatives, in platform order.
    ///
    /// Stops at the first page token already followed, so a platform that
    /// cycles through tokens cannot keep the listing running.
    pub async fn list_all(&self) -> Result<Vec<Creative>, ClientError> {
        let mut creatives = Vec::new();
        let mut token: Option<String> = None;
        let mut seen = HashSet::new();
        let mut pages = 0u32;
        loop {
            let page = self.list_page(token.as_deref()).await?;
            pages += 1;
            creatives.extend(page.creatives);
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if !seen.insert(next.clone()) => {
                    tracing::warn!(page_token = %next, pages, "listing returned a page token twice; stopping");
                    break;
                }
                Some(next) => token = Some(next),
                None => break,
            }
        }
        tracing::debug!(pages, creatives = creatives.len(), "creative listing complete");
        Ok(creatives)
    }

    /// Resolve one creative for appeal.
    ///
    /// Calls `GET {base}/v1/accounts/{account}/groups/{groupId}/creatives/{creativeId}`.
    /// A 404 is `Ok(None)`.
    pub async fn get_creative(
        &self,
        group_id: &GroupId,
        creative_id: &CreativeId,
    ) -> Result<Option<AppealTarget>, ClientError> {
        let endpoint = format!("GET /groups/{group_id}/creatives/{creative_id}");
        let url = self.url(&["groups", group_id.as_str(), "creatives", creative_id.as_str()])?;

        let resp = self.retry.send(&endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            return Err(ClientError::from_response(&endpoint, resp).await);
        }

        resp.json()
            .await
            .map(Some)
            .map_err(|e| ClientError::Deserialization { endpoint, source: e })
    }

    /// Submit an appeal. Sent exactly once.
    ///
    /// Calls `POST {base}/v1/accounts/{account}/groups/{groupId}/creatives/{creativeId}:appeal`.
    pub async fn submit_appeal(
        &self,
        target: &AppealTarget,
        justification: &str,
        topics: &[PolicyTopic],
    ) -> Result<(), ClientError> {
        let action = format!("{}:appeal", target.creative_id);
        let endpoint = format!("POST /groups/{}/creatives/{action}", target.group_id);
        let url = self.url(&["groups", target.group_id.as_str(), "creatives", &action])?;
        let body = AppealRequest {
            resource_name: &target.resource_name,
            justification,
            policy_topics: topics.iter().map(PolicyTopic::as_str).collect(),
        };

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(ClientError::from_response(&endpoint, resp).await);
        }
        Ok(())
    }
}

impl CreativeSource for AdsClient {
    type Error = ClientError;

    async fn fetch_creatives(&self) -> Result<Vec<Creative>, ClientError> {
        self.list_all().await
    }
}

impl AppealGateway for AdsClient {
    type Error = ClientError;

    async fn find_creative(
        &self,
        group_id: &GroupId,
        creative_id: &CreativeId,
    ) -> Result<Option<AppealTarget>, ClientError> {
        self.get_creative(group_id, creative_id).await
    }

    async fn appeal(
        &self,
        target: &AppealTarget,
        justification: &str,
        topics: &[PolicyTopic],
    ) -> Result<(), ClientError> {
        self.submit_appeal(target, justification, topics).await
    }
}
