//! Client error types.

/// Errors from ads platform and mail relay calls.
///
/// The `Display` form is what ends up in a failed appeal's report entry, so
/// every variant names the endpoint it came from.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The remote returned a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

impl ClientError {
    /// Build a [`ClientError::Status`] from a failed response, consuming its body.
    pub(crate) async fn from_response(endpoint: &str, resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Self::Status {
            endpoint: endpoint.to_string(),
            status,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn status_display_is_self_describing() {
        let err = ClientError::Status {
            endpoint: "POST /creatives/A:appeal".into(),
            status: 400,
            body: "POLICY_FINDING_NOT_APPEALABLE".into(),
        };
        assert_eq!(
            err.to_string(),
            "POST /creatives/A:appeal returned 400: POLICY_FINDING_NOT_APPEALABLE"
        );
    }

    #[test]
    fn config_error_converts() {
        let err: ClientError = ConfigError::Missing("ADS_API_TOKEN").into();
        assert!(err.to_string().contains("ADS_API_TOKEN"));
    }
}
