//! Retry policy for idempotent reads against the ads platform.
//!
//! A read is retried when the request produced no response (connect failure,
//! timeout) or when the platform answered `429` or a `5xx`. Any other status
//! goes straight back to the caller. The appeal action never goes through
//! here.

use std::future::Future;
use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};

/// First backoff step; doubled on each further attempt.
const BASE_DELAY: Duration = Duration::from_millis(200);

/// Ceiling on one wait, whatever `Retry-After` asks for.
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Retry budget for listing and lookup requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReadRetry {
    max_retries: u32,
    base_delay: Duration,
}

impl ReadRetry {
    /// Allow up to `max_retries` further attempts after the first request.
    pub(crate) fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: BASE_DELAY,
        }
    }

    #[cfg(test)]
    fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Send a read, retrying transient failures within the budget.
    ///
    /// Once the budget is spent the last outcome is returned as is, so the
    /// caller still sees the final status and body.
    pub(crate) async fn send<F, Fut>(&self, endpoint: &str, request: F) -> Result<Response, reqwest::Error>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Response, reqwest::Error>>,
    {
        let mut attempt = 0;
        loop {
            let outcome = request().await;
            let transient = match &outcome {
                Ok(resp) if is_transient(resp.status()) => {
                    Some((resp.status().to_string(), retry_after(resp)))
                }
                Ok(_) => None,
                Err(e) => Some((e.to_string(), None)),
            };
            let Some((reason, hint)) = transient.filter(|_| attempt < self.max_retries) else {
                return outcome;
            };

            let delay = self.delay(attempt, hint);
            tracing::warn!(
                endpoint,
                attempt = attempt + 1,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                %reason,
                "transient read failure; retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Wait before retry number `attempt + 1`. A server hint longer than the
    /// backoff wins, capped at [`MAX_DELAY`].
    fn delay(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        let backoff = self.base_delay.saturating_mul(1u32 << attempt.min(16));
        hint.map_or(backoff, |hint| hint.max(backoff)).min(MAX_DELAY)
    }
}

fn is_transient(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// `Retry-After` in delta-seconds form. HTTP dates are ignored.
fn retry_after(resp: &Response) -> Option<Duration> {
    resp.headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
