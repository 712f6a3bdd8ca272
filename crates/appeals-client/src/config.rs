//! Ads platform client configuration.
//!
//! Loaded from the environment in production. Tests build it directly with
//! [`AdsApiConfig::new`] pointing at a mock server.

use url::Url;
use zeroize::Zeroizing;

/// Default listing page size.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default retry budget for listing and lookup reads.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Configuration for the ads platform and mail relay adapters.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct AdsApiConfig {
    /// Platform base URL, e.g. `https://ads.example.com`.
    pub base_url: Url,
    /// Bearer token. Wiped from memory on drop.
    pub api_token: Zeroizing<String>,
    /// Account whose creatives are audited.
    pub account_id: String,
    /// Creatives requested per listing page.
    pub page_size: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Further attempts allowed for a read after a transient failure.
    pub max_retries: u32,
    /// Mail relay base URL. Reports are only logged when absent.
    pub mail_relay_url: Option<Url>,
}

impl std::fmt::Debug for AdsApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdsApiConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("mail_relay_url", &self.mail_relay_url)
            .finish()
    }
}

impl AdsApiConfig {
    /// Configuration with default page size, timeout and retry budget, and
    /// no mail relay.
    pub fn new(base_url: Url, api_token: &str, account_id: &str) -> Self {
        Self {
            base_url,
            api_token: Zeroizing::new(api_token.to_string()),
            account_id: account_id.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            mail_relay_url: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ADS_API_URL` (required)
    /// - `ADS_API_TOKEN` (required)
    /// - `ADS_ACCOUNT_ID` (required)
    /// - `ADS_PAGE_SIZE` (default: 500)
    /// - `ADS_TIMEOUT_SECS` (default: 30)
    /// - `ADS_MAX_RETRIES` (default: 3; `0` disables read retries)
    /// - `MAIL_RELAY_URL` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };

        let base_url = parse_base_url("ADS_API_URL", &required("ADS_API_URL")?)?;
        let api_token = Zeroizing::new(required("ADS_API_TOKEN")?);
        let account_id = required("ADS_ACCOUNT_ID")?.trim().to_string();
        let page_size = parse_number("ADS_PAGE_SIZE", lookup("ADS_PAGE_SIZE"), DEFAULT_PAGE_SIZE)?;
        let timeout_secs =
            parse_number("ADS_TIMEOUT_SECS", lookup("ADS_TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;
        let max_retries =
            parse_number("ADS_MAX_RETRIES", lookup("ADS_MAX_RETRIES"), DEFAULT_MAX_RETRIES)?;
        let mail_relay_url = lookup("MAIL_RELAY_URL")
            .filter(|v| !v.trim().is_empty())
            .map(|raw| parse_base_url("MAIL_RELAY_URL", &raw))
            .transpose()?;

        if page_size == 0 {
            return Err(ConfigError::InvalidNumber("ADS_PAGE_SIZE", "0".into()));
        }

        Ok(Self {
            base_url,
            api_token,
            account_id,
            page_size,
            timeout_secs,
            max_retries,
            mail_relay_url,
        })
    }
}

fn parse_base_url(var: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(var, e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(var, "not a base URL".into()));
    }
    Ok(url)
}

fn parse_number<T: std::str::FromStr>(
    var: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var, raw)),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(&'static str, String),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(&'static str, String),
    #[error("API token contains characters not allowed in a header")]
    InvalidToken,
}
