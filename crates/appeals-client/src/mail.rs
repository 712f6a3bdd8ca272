//! Mail relay report sink.
//!
//! Calls `POST {relay}/v1/messages` with `{"to", "subject", "body"}`. The
//! relay owns SMTP; this client only hands the message over.

use std::time::Duration;

use appeals_core::ReportSink;
use serde::Serialize;
use url::Url;

use crate::config::ConfigError;
use crate::error::ClientError;

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// [`ReportSink`] backed by an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct MailRelayClient {
    http: reqwest::Client,
    relay_url: Url,
}

impl MailRelayClient {
    /// Build a client for the relay at `relay_url`.
    pub fn new(relay_url: Url, timeout_secs: u64) -> Result<Self, ClientError> {
        if relay_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl("MAIL_RELAY_URL", "not a base URL".into()).into());
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http, relay_url })
    }

    fn messages_url(&self) -> Url {
        let mut url = self.relay_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["v1", "messages"]);
        }
        url
    }
}

impl ReportSink for MailRelayClient {
    type Error = ClientError;

    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ClientError> {
        let endpoint = "POST /v1/messages";
        let resp = self
            .http
            .post(self.messages_url())
            .json(&MessageRequest { to, subject, body })
            .send()
            .await
            .map_err(|e| ClientError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        if !resp.status().is_success() {
            return Err(ClientError::from_response(endpoint, resp).await);
        }
        Ok(())
    }
}
