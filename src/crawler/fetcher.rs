//! Rate-limited, retrying page fetcher
//!
//! Every request made by the crawl engine goes through [`Fetcher::fetch`]:
//! - The per-domain rate limit is applied once per fetch, before the first attempt
//! - Transport failures and transient HTTP statuses are retried with backoff
//! - Any other response is handed back to the caller as-is

use crate::config::ExtractorConfig;
use crate::crawler::rate_limiter::{random_jitter, RateLimiter};
use crate::crawler::transport::{FetchError, FetchResponse, Transport};
use crate::url::domain_of;
use std::sync::Arc;
use std::time::Duration;

/// HTTP statuses treated as transient
pub const RETRYABLE_STATUSES: [u16; 10] = [429, 500, 502, 503, 504, 520, 521, 522, 523, 524];

/// Returns true if a response with this status is worth retrying
pub fn is_retryable_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Backoff schedule for [`Fetcher`]
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Base delay after a timeout
    pub timeout_backoff: Duration,

    /// Base delay after a connection failure
    pub connect_backoff: Duration,

    /// Base delay after any other transport failure
    pub request_backoff: Duration,

    /// Delay after a transient status on the first attempt, doubled per attempt
    pub status_backoff_base: Duration,

    /// Upper bound of the random delay added to every backoff
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            timeout_backoff: Duration::from_secs(1),
            connect_backoff: Duration::from_secs(2),
            request_backoff: Duration::from_secs(1),
            status_backoff_base: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            ..Self::default()
        }
    }

    /// A policy that retries without sleeping, for tests
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            timeout_backoff: Duration::ZERO,
            connect_backoff: Duration::ZERO,
            request_backoff: Duration::ZERO,
            status_backoff_base: Duration::ZERO,
            max_jitter: Duration::ZERO,
        }
    }

    /// Base delay after a transient status on the given zero-based attempt
    fn status_backoff(&self, attempt: u32) -> Duration {
        self.status_backoff_base.saturating_mul(2u32.saturating_pow(attempt))
    }

    fn error_backoff(&self, err: &FetchError) -> Duration {
        match err {
            FetchError::Timeout => self.timeout_backoff,
            FetchError::Connect(_) => self.connect_backoff,
            FetchError::Request(_) => self.request_backoff,
        }
    }
}

/// Fetches pages through a [`Transport`] with rate limiting and retries
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            limiter,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Fetches `url` with up to `max_retries` retries
    ///
    /// # Retry Logic
    ///
    /// | Outcome | Action |
    /// |---------|--------|
    /// | 2xx | Return the response |
    /// | 429, 500, 502-504, 520-524 | Retry after `base * 2^attempt` plus jitter |
    /// | Other status | Return the response |
    /// | Timeout | Retry after 1s plus jitter |
    /// | Connection failure | Retry after 2s plus jitter |
    /// | Other transport failure | Retry after 1s plus jitter |
    ///
    /// When retries run out, a transient status is returned as the last
    /// response and a transport failure is returned as `Err`.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute URL to fetch
    /// * `timeout` - Total timeout for each attempt
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResponse, FetchError> {
        let domain = domain_of(url).unwrap_or_else(|| url.to_string());
        self.limiter.wait(&domain).await;

        let mut attempt = 0;
        loop {
            let delay = match self.transport.get(url, timeout).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response)
                    if is_retryable_status(response.status) && attempt < self.policy.max_retries =>
                {
                    tracing::warn!(
                        url,
                        status = response.status,
                        attempt = attempt + 1,
                        "Transient HTTP status, retrying"
                    );
                    self.policy.status_backoff(attempt)
                }
                Ok(response) => {
                    tracing::debug!(url, status = response.status, "Non-success response");
                    return Ok(response);
                }
                Err(err) if attempt < self.policy.max_retries => {
                    tracing::warn!(
                        url,
                        error = %err,
                        attempt = attempt + 1,
                        "Request failed, retrying"
                    );
                    self.policy.error_backoff(&err)
                }
                Err(err) => {
                    tracing::warn!(url, error = %err, "Request failed after all retry attempts");
                    return Err(err);
                }
            };

            tokio::time::sleep(delay + random_jitter(self.policy.max_jitter)).await;
            attempt += 1;
        }
    }
}
